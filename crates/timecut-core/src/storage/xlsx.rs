//! Read-only import of Excel/ODS workbooks through calamine.
//!
//! Values come across; formatting does not. Saving back to these formats is
//! not supported, so an imported workbook is saved as .grd or .csv.

use crate::error::{Result, TimecutError};
use crate::workbook::Sheet;
use calamine::{Data, Reader, open_workbook_auto};
use std::path::Path;
use timecut_engine::grid::{Cell, CellRef, CellValue};
use tracing::debug;

pub fn parse_xlsx(path: &Path) -> Result<Vec<Sheet>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| TimecutError::Xlsx(e.to_string()))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| TimecutError::Xlsx(format!("{}: {}", name, e)))?;
        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let sheet = Sheet::new(&name);
        for (row_idx, row) in range.rows().enumerate() {
            for (col_idx, data) in row.iter().enumerate() {
                let value = convert(data);
                if value.is_empty() {
                    continue;
                }
                let at = CellRef::new(col_offset + col_idx, row_offset + row_idx);
                sheet.grid.insert(at, Cell::new(value));
            }
        }
        debug!(sheet = %name, cells = sheet.grid.len(), "imported sheet");
        sheets.push(sheet);
    }

    Ok(sheets)
}

fn convert(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::text(s),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::text(if *b { "TRUE" } else { "FALSE" }),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => CellValue::Date(dt),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => crate::storage::parser::parse_date(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::text(s)),
        Data::DurationIso(s) => CellValue::text(s),
        Data::Error(e) => CellValue::text(&format!("#{:?}", e)),
    }
}
