//! Writer for the .grd workbook format

use crate::error::Result;
use crate::workbook::Sheet;
use std::fs;
use std::path::Path;
use timecut_engine::grid::{Cell, CellValue, Fill, row_major};

/// Write sheets to a .grd file
pub fn write_grd(path: &Path, sheets: &[Sheet]) -> Result<()> {
    let content = write_grd_content(sheets);
    fs::write(path, content)?;
    Ok(())
}

/// Write sheets to a .grd format string
pub fn write_grd_content(sheets: &[Sheet]) -> String {
    let mut lines = vec!["# Timecut Workbook".to_string()];

    for sheet in sheets {
        lines.push(format!("[{}]", sheet.name));

        for cell_ref in row_major(&sheet.grid) {
            let Some(entry) = sheet.grid.get(&cell_ref) else {
                continue;
            };
            let cell = entry.value();

            if let Some(value_str) = format_value(&cell.value) {
                lines.push(format!("{}: {}", cell_ref, value_str));
            }
            if let Some(style) = format_style(cell) {
                lines.push(format!("{}.style: {}", cell_ref, style));
            }
        }
    }

    lines.join("\n") + "\n"
}

fn format_value(value: &CellValue) -> Option<String> {
    match value {
        CellValue::Empty => None,
        CellValue::Number(n) => Some(n.to_string()),
        CellValue::Text(s) => Some(format!("\"{}\"", escape_grd_text(s))),
        CellValue::Date(_) => Some(format!("@{}", value.display())),
    }
}

fn format_style(cell: &Cell) -> Option<String> {
    if !cell.has_style() {
        return None;
    }
    let mut parts = Vec::new();
    if let Some(Fill::Solid(rgb)) = cell.fill {
        parts.push(format!("fill={}", rgb));
    }
    if let Some(alignment) = cell.alignment {
        parts.push(format!("align={}", alignment.as_str()));
    }
    Some(parts.join(" "))
}

fn escape_grd_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}
