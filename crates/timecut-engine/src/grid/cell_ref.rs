//! Cell positions and A1 notation.
//!
//! Positions are zero-indexed; A1 text is what storage files and anomaly
//! reports use.
//!
//! # Examples
//!
//! ```
//! use timecut_engine::grid::CellRef;
//!
//! let cell = CellRef::from_str("B3").unwrap();
//! assert_eq!(cell.col, 1);
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// A reference to a cell by row and column indices (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

fn a1_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$").expect("A1 pattern is valid")
    })
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a cell reference from spreadsheet notation (e.g., "A1", "AA10").
    /// Returns None if the input is invalid.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        let caps = a1_re().captures(name)?;

        let mut col_acc = 0usize;
        for c in caps["letters"].to_ascii_uppercase().bytes() {
            let digit = (c - b'A') as usize + 1;
            col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
        }
        let col = col_acc.checked_sub(1)?;
        let row = caps["numbers"].parse::<usize>().ok()?.checked_sub(1)?;

        Some(CellRef::new(col, row))
    }

    /// Convert column index to letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellRef::from_str(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::CellRef;

    #[test]
    fn parses_single_and_double_letter_columns() {
        assert_eq!(CellRef::from_str("A1"), Some(CellRef::new(0, 0)));
        assert_eq!(CellRef::from_str("Z1"), Some(CellRef::new(25, 0)));
        assert_eq!(CellRef::from_str("AA1"), Some(CellRef::new(26, 0)));
        assert_eq!(CellRef::from_str("b10"), Some(CellRef::new(1, 9)));
    }

    #[test]
    fn rejects_invalid_references() {
        assert!(CellRef::from_str("").is_none());
        assert!(CellRef::from_str("123").is_none());
        assert!(CellRef::from_str("A0").is_none());
        assert!(CellRef::from_str("A 1").is_none());
    }

    #[test]
    fn parse_overflow_returns_none() {
        let huge = format!("{}1", "Z".repeat(40));
        assert!(CellRef::from_str(&huge).is_none());
    }

    #[test]
    fn display_round_trips() {
        let cell = CellRef::new(27, 4);
        assert_eq!(cell.to_string(), "AB5");
        assert_eq!(CellRef::from_str(&cell.to_string()), Some(cell));
    }

    #[test]
    fn orders_rows_before_columns() {
        let mut refs = vec![CellRef::new(0, 1), CellRef::new(3, 0), CellRef::new(1, 0)];
        refs.sort();
        assert_eq!(refs, vec![CellRef::new(1, 0), CellRef::new(3, 0), CellRef::new(0, 1)]);
    }
}
