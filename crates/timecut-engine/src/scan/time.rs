//! Time range normalization.
//!
//! Timetables write slots as ranges like `9-10`, `"09-10"` or `="3-4"`, in
//! twelve hour form without AM/PM. The scan rewrites such a cell to the start
//! of its range as a 24-hour `H:00` label.

use regex::Regex;
use std::sync::OnceLock;

/// Starts below this hour are afternoon slots and gain twelve hours.
const AFTERNOON_BEFORE: u32 = 9;

fn range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+-[0-9]+").expect("range pattern is valid"))
}

fn label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{1,2}:00$").expect("label pattern is valid"))
}

/// True when the text contains a `digits-digits` range anywhere.
pub fn looks_like_range(text: &str) -> bool {
    range_re().is_match(text)
}

/// True for labels this module produces (`9:00`, `15:00`).
pub fn is_time_label(text: &str) -> bool {
    label_re().is_match(text.trim())
}

/// Rewrite a range to its normalized start label.
///
/// Returns `None` when the text is not a range or its start half is not a
/// plain number; such cells are left to the course filter. A start written
/// with a leading zero (`09`) loses that zero and is never promoted.
pub fn normalize_time(text: &str) -> Option<String> {
    if !looks_like_range(text) {
        return None;
    }

    let start = text
        .trim_matches([' ', '=', '"'])
        .split('-')
        .next()
        .unwrap_or_default();

    let hour = if let Some(rest) = start.strip_prefix('0') {
        if rest.is_empty() {
            0
        } else if rest.starts_with(|c: char| c.is_alphabetic()) {
            return None;
        } else {
            rest.parse::<u32>().ok()?
        }
    } else {
        if start.is_empty() || start.starts_with(|c: char| c.is_alphabetic()) {
            return None;
        }
        let hour = start.parse::<u32>().ok()?;
        if hour < AFTERNOON_BEFORE { hour + 12 } else { hour }
    };

    Some(format!("{}:00", hour))
}
