//! CSV import/export. A CSV file is a workbook with one sheet named after
//! the file stem; presentation attributes are not stored.

use crate::error::{Result, TimecutError};
use crate::storage::parser::parse_date;
use crate::workbook::Sheet;
use std::path::Path;
use timecut_engine::grid::{Cell, CellRef, CellValue, row_major};
use tracing::warn;

/// Parse a CSV file into a single sheet
pub fn parse_csv(path: &Path) -> Result<Sheet> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Sheet1".to_string());
    let content = std::fs::read_to_string(path)?;
    parse_csv_content(&name, &content)
}

pub fn parse_csv_content(name: &str, content: &str) -> Result<Sheet> {
    if content.trim().is_empty() {
        return Err(TimecutError::EmptyCsv);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let sheet = Sheet::new(name);
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| TimecutError::Parse {
            line: row_idx + 1,
            message: e.to_string(),
        })?;
        for (col_idx, field) in record.iter().enumerate() {
            let value = parse_csv_field(field);
            if value.is_empty() {
                continue;
            }
            sheet.grid.insert(CellRef::new(col_idx, row_idx), Cell::new(value));
        }
    }

    Ok(sheet)
}

/// Parse a CSV field into a cell value
/// - Blank -> Empty
/// - Number -> Number (unless it has leading zeros like "09")
/// - ISO or dd/mm/yyyy date -> Date
/// - Otherwise -> Text
pub(crate) fn parse_csv_field(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }

    // Keep explicit surrounding whitespace (typically from quoted fields).
    if field != trimmed {
        return CellValue::text(field);
    }

    if trimmed.starts_with('0')
        && trimmed.len() > 1
        && !trimmed.starts_with("0.")
        && trimmed.chars().nth(1).is_some_and(|c| c.is_ascii_digit())
    {
        return CellValue::text(trimmed);
    }

    if let Ok(n) = trimmed.parse::<f64>() {
        return CellValue::Number(n);
    }

    if let Some(date) = parse_date(trimmed).or_else(|| {
        chrono::NaiveDate::parse_from_str(trimmed, "%d/%m/%Y")
            .ok()
            .map(|d| d.and_time(chrono::NaiveTime::MIN))
    }) {
        return CellValue::Date(date);
    }

    CellValue::text(trimmed)
}

/// Export a sheet to CSV using display values.
pub fn write_csv(path: &Path, sheet: &Sheet) -> Result<()> {
    let content = write_csv_content(sheet)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn write_csv_content(sheet: &Sheet) -> Result<String> {
    let refs = row_major(&sheet.grid);
    let styled = refs
        .iter()
        .filter(|r| sheet.grid.get(r).is_some_and(|c| c.has_style()))
        .count();
    if styled > 0 {
        warn!(sheet = %sheet.name, cells = styled, "CSV output drops cell fill and alignment");
    }

    let max_row = refs.iter().map(|r| r.row).max();
    let max_col = refs.iter().map(|r| r.col).max().unwrap_or(0);

    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    if let Some(max_row) = max_row {
        for row in 0..=max_row {
            let fields: Vec<String> = (0..=max_col)
                .map(|col| {
                    sheet
                        .grid
                        .get(&CellRef::new(col, row))
                        .map(|c| guard_formula(&c.value.display()))
                        .unwrap_or_default()
                })
                .collect();
            writer.write_record(&fields).map_err(csv_io_error)?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| csv_io_error(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn csv_io_error(e: impl Into<std::io::Error>) -> TimecutError {
    TimecutError::Io(e.into())
}

/// Guard against CSV formula injection in spreadsheet apps.
fn guard_formula(field: &str) -> String {
    let first_non_space = field.trim_start_matches([' ', '\t']).chars().next();
    if matches!(first_non_space, Some('=' | '+' | '-' | '@')) {
        format!("'{}", field)
    } else {
        field.to_string()
    }
}
