//! Parser for the .grd workbook format
//!
//! ```text
//! # comment
//! [Year 1]
//! A1: "Week"
//! A2: @2024-09-16
//! B2: ="09-10"
//! C2: 42
//! C3.style: fill=FFFFFF align=center
//! ```
//!
//! Cells before the first `[sheet]` header go to a sheet named `Sheet1`.

use crate::error::{Result, TimecutError};
use crate::workbook::Sheet;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::Path;
use timecut_engine::grid::{Alignment, Cell, CellRef, CellValue, Fill, Rgb};

const STYLE_SUFFIX: &str = ".style";

/// Parse a .grd file into its sheets
pub fn parse_grd(path: &Path) -> Result<Vec<Sheet>> {
    let content = fs::read_to_string(path)?;
    parse_grd_content(&content)
}

/// Parse .grd content from a string
pub fn parse_grd_content(content: &str) -> Result<Vec<Sheet>> {
    let mut sheets: Vec<Sheet> = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line_num = line_num + 1;
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim();
            if name.is_empty() {
                return Err(parse_error(line_num, "Sheet name cannot be empty"));
            }
            sheets.push(Sheet::new(name));
            continue;
        }

        // Parse "CELLREF: VALUE" or "CELLREF.style: STYLE"
        let Some((key, value_str)) = line.split_once(':') else {
            return Err(parse_error(line_num, "Expected 'CELLREF: VALUE' format"));
        };
        let key = key.trim();

        if sheets.is_empty() {
            sheets.push(Sheet::new("Sheet1"));
        }
        let grid = &sheets[sheets.len() - 1].grid;

        if let Some(cell_key) = key.strip_suffix(STYLE_SUFFIX) {
            let cell_ref = parse_cell_ref(cell_key, line_num)?;
            let (fill, alignment) = parse_style(value_str, line_num)?;
            let mut cell = grid.entry(cell_ref).or_insert_with(Cell::new_empty);
            cell.fill = fill.or(cell.fill);
            cell.alignment = alignment.or(cell.alignment);
        } else {
            let cell_ref = parse_cell_ref(key, line_num)?;
            let value = parse_cell_value(value_str, line_num)?;
            grid.entry(cell_ref).or_insert_with(Cell::new_empty).value = value;
        }
    }

    Ok(sheets)
}

fn parse_error(line: usize, message: impl Into<String>) -> TimecutError {
    TimecutError::Parse {
        line,
        message: message.into(),
    }
}

fn parse_cell_ref(key: &str, line_num: usize) -> Result<CellRef> {
    CellRef::from_str(key.trim())
        .ok_or_else(|| parse_error(line_num, format!("Invalid cell reference: {}", key.trim())))
}

/// Parse a cell value string
fn parse_cell_value(value: &str, line_num: usize) -> Result<CellValue> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(CellValue::Empty);
    }

    // Formula text is kept verbatim; nothing is evaluated.
    if value.starts_with('=') {
        return Ok(CellValue::text(value));
    }

    // Quoted string: starts and ends with '"'
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        let text = &value[1..value.len() - 1];
        return Ok(CellValue::Text(unescape_grd_text(text)));
    }

    if let Some(date) = value.strip_prefix('@') {
        return parse_date(date)
            .map(CellValue::Date)
            .ok_or_else(|| parse_error(line_num, format!("Invalid date: {}", date)));
    }

    if let Ok(n) = value.parse::<f64>() {
        return Ok(CellValue::Number(n));
    }

    Err(parse_error(
        line_num,
        format!("Invalid value: {}. Use quotes for text.", value),
    ))
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM` and `YYYY-MM-DDTHH:MM:SS`.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_time(chrono::NaiveTime::MIN));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn parse_style(style: &str, line_num: usize) -> Result<(Option<Fill>, Option<Alignment>)> {
    let mut fill = None;
    let mut alignment = None;

    for part in style.split_whitespace() {
        let Some((key, value)) = part.split_once('=') else {
            return Err(parse_error(line_num, format!("Expected key=value, got {}", part)));
        };
        match key {
            "fill" => {
                let rgb = Rgb::from_hex(value)
                    .ok_or_else(|| parse_error(line_num, format!("Invalid colour: {}", value)))?;
                fill = Some(Fill::Solid(rgb));
            }
            "align" => {
                alignment = Some(Alignment::parse(value).ok_or_else(|| {
                    parse_error(line_num, format!("Invalid alignment: {}", value))
                })?);
            }
            other => {
                return Err(parse_error(line_num, format!("Unknown style key: {}", other)));
            }
        }
    }

    Ok((fill, alignment))
}

fn unescape_grd_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some('n') => out.push('\n'),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_at(sheet: &Sheet, a1: &str) -> CellValue {
        sheet
            .grid
            .get(&CellRef::from_str(a1).unwrap())
            .unwrap()
            .value
            .clone()
    }

    #[test]
    fn test_parse_values() {
        let content = r#"
A1: "Hello"
A2: 42
A3: @2024-09-16
A4: ="09-10"
A5: "He said \"hi\""
"#;
        let sheets = parse_grd_content(content).unwrap();
        assert_eq!(sheets.len(), 1);
        let sheet = &sheets[0];
        assert_eq!(sheet.name, "Sheet1");
        assert_eq!(value_at(sheet, "A1"), CellValue::text("Hello"));
        assert_eq!(value_at(sheet, "A2"), CellValue::Number(42.0));
        assert_eq!(
            value_at(sheet, "A3"),
            CellValue::date(NaiveDate::from_ymd_opt(2024, 9, 16).unwrap())
        );
        assert_eq!(value_at(sheet, "A4"), CellValue::text("=\"09-10\""));
        assert_eq!(value_at(sheet, "A5"), CellValue::text("He said \"hi\""));
    }

    #[test]
    fn test_parse_sheets() {
        let content = r#"
# Timetable
[Year 1]
A1: "Mon"

[Year 2]
A1: "Tues"
[Year 3]
"#;
        let sheets = parse_grd_content(content).unwrap();
        let names: Vec<_> = sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Year 1", "Year 2", "Year 3"]);
        assert_eq!(value_at(&sheets[1], "A1"), CellValue::text("Tues"));
        assert!(sheets[2].grid.is_empty());
    }

    #[test]
    fn test_parse_style_without_value() {
        let content = "B2.style: fill=FFFFFF\nC2: \"GR\"\nC2.style: align=center";
        let sheets = parse_grd_content(content).unwrap();
        let grid = &sheets[0].grid;

        let blank = grid.get(&CellRef::new(1, 1)).unwrap();
        assert_eq!(blank.value, CellValue::Empty);
        assert_eq!(blank.fill, Some(Fill::white()));

        let kept = grid.get(&CellRef::new(2, 1)).unwrap();
        assert_eq!(kept.value, CellValue::text("GR"));
        assert_eq!(kept.alignment, Some(Alignment::Center));
    }

    #[test]
    fn test_parse_datetime() {
        let sheets = parse_grd_content("A1: @2024-09-16T09:30:00").unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 9, 16)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(value_at(&sheets[0], "A1"), CellValue::Date(expected));
    }

    #[test]
    fn test_parse_errors_carry_line() {
        match parse_grd_content("A1: 1\nA2 \"x\"") {
            Err(TimecutError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(parse_grd_content("A1: bare words").is_err());
        assert!(parse_grd_content("A1: @2024-13-40").is_err());
        assert!(parse_grd_content("A1.style: fill=red").is_err());
        assert!(parse_grd_content("[ ]").is_err());
    }
}
