//! Cell data structures for the timetable grid.
//!
//! - [`CellValue`] - What a cell holds (empty, text, number, or date)
//! - [`Fill`], [`Alignment`] - Presentation attributes the scan may rewrite
//! - [`Cell`] - A value plus its presentation
//! - [`Grid`] - Shared sparse storage for cells (backed by `DashMap`)

use chrono::{NaiveDate, NaiveDateTime};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::cell_ref::CellRef;

/// The value stored in a cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
}

impl CellValue {
    pub fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    /// A date at midnight.
    pub fn date(date: NaiveDate) -> CellValue {
        CellValue::Date(date.and_time(chrono::NaiveTime::MIN))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Short name of the value kind, used in logs and anomaly reports.
    pub fn kind(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Text(_) => "text",
            CellValue::Number(_) => "number",
            CellValue::Date(_) => "date",
        }
    }

    /// Display string for the value (what a CSV export shows).
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Date(dt) => {
                if dt.time() == chrono::NaiveTime::MIN {
                    dt.date().format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
                }
            }
        }
    }
}

/// Format a number for display.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e10 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

/// An RGB colour, written as six hex digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);

    /// Parse `FFFFFF` or `#ffffff`.
    pub fn from_hex(s: &str) -> Option<Rgb> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Background fill of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fill {
    Solid(Rgb),
}

impl Fill {
    pub fn white() -> Fill {
        Fill::Solid(Rgb::WHITE)
    }
}

/// Horizontal text alignment of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }

    pub fn parse(s: &str) -> Option<Alignment> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Alignment::Left),
            "center" | "centre" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            _ => None,
        }
    }
}

/// A cell in the timetable grid.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    pub fill: Option<Fill>,
    pub alignment: Option<Alignment>,
}

impl Cell {
    pub fn new(value: CellValue) -> Cell {
        Cell {
            value,
            fill: None,
            alignment: None,
        }
    }

    pub fn new_empty() -> Cell {
        Cell::new(CellValue::Empty)
    }

    pub fn new_text(text: &str) -> Cell {
        Cell::new(CellValue::text(text))
    }

    pub fn new_number(n: f64) -> Cell {
        Cell::new(CellValue::Number(n))
    }

    pub fn new_date(date: NaiveDate) -> Cell {
        Cell::new(CellValue::date(date))
    }

    /// True when the cell carries presentation worth persisting.
    pub fn has_style(&self) -> bool {
        self.fill.is_some() || self.alignment.is_some()
    }
}

/// Shared sparse grid storage. Clones share the same cells.
pub type Grid = Arc<DashMap<CellRef, Cell>>;

pub fn new_grid() -> Grid {
    Arc::new(DashMap::new())
}

/// Populated positions ordered rows first, then columns.
pub fn row_major(grid: &Grid) -> Vec<CellRef> {
    let mut refs: Vec<CellRef> = grid.iter().map(|entry| *entry.key()).collect();
    refs.sort();
    refs
}

/// Build a grid from rows of values, starting at A1. Empty values are not stored.
pub fn grid_from_rows<R, I>(rows: R) -> Grid
where
    R: IntoIterator<Item = I>,
    I: IntoIterator<Item = CellValue>,
{
    let grid = new_grid();
    for (row_idx, row) in rows.into_iter().enumerate() {
        for (col_idx, value) in row.into_iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            grid.insert(CellRef::new(col_idx, row_idx), Cell::new(value));
        }
    }
    grid
}

/// Build a grid from rows of text. Empty strings are not stored.
pub fn grid_from_text_rows(rows: &[&[&str]]) -> Grid {
    grid_from_rows(rows.iter().map(|row| {
        row.iter()
            .map(|s| {
                if s.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::text(s)
                }
            })
            .collect::<Vec<_>>()
    }))
}
