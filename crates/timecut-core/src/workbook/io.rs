use super::Workbook;
use crate::error::{Result, TimecutError};
use crate::storage::{parse_csv, parse_grd, write_csv, write_grd};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File formats, chosen by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Grd,
    Csv,
    /// Excel/ODS, read only
    Spreadsheet,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Format> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "grd" | "grid" => Ok(Format::Grd),
            "csv" => Ok(Format::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(Format::Spreadsheet),
            "" => Err(TimecutError::UnsupportedFormat(format!(
                "{} has no extension",
                path.display()
            ))),
            other => Err(TimecutError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn can_write(&self) -> bool {
        !matches!(self, Format::Spreadsheet)
    }
}

impl Workbook {
    /// Load a workbook, picking the format from the extension.
    pub fn open(path: &Path) -> Result<Self> {
        let sheets = match Format::from_path(path)? {
            Format::Grd => parse_grd(path)?,
            Format::Csv => vec![parse_csv(path)?],
            Format::Spreadsheet => read_spreadsheet(path)?,
        };
        debug!(path = %path.display(), sheets = sheets.len(), "loaded workbook");

        Ok(Workbook {
            sheets,
            file_path: Some(path.to_path_buf()),
        })
    }

    /// Save to current file path.
    /// Returns the path saved to.
    pub fn save(&mut self) -> Result<PathBuf> {
        let Some(path) = self.file_path.clone() else {
            return Err(TimecutError::NoFilePath);
        };
        self.save_as(&path)?;
        Ok(path)
    }

    /// Save to `path` and make it the current file path.
    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        match Format::from_path(path)? {
            Format::Grd => write_grd(path, &self.sheets)?,
            Format::Csv => {
                let [sheet] = self.sheets.as_slice() else {
                    return Err(TimecutError::UnsupportedFormat(format!(
                        "CSV holds one sheet, workbook has {}",
                        self.sheets.len()
                    )));
                };
                write_csv(path, sheet)?;
            }
            Format::Spreadsheet => {
                return Err(TimecutError::UnsupportedFormat(format!(
                    "cannot write {}; save as .grd or .csv",
                    path.display()
                )));
            }
        }
        info!(path = %path.display(), "saved workbook");
        self.file_path = Some(path.to_path_buf());
        Ok(())
    }
}

#[cfg(feature = "xlsx")]
fn read_spreadsheet(path: &Path) -> Result<Vec<crate::workbook::Sheet>> {
    crate::storage::parse_xlsx(path)
}

#[cfg(not(feature = "xlsx"))]
fn read_spreadsheet(path: &Path) -> Result<Vec<crate::workbook::Sheet>> {
    Err(TimecutError::UnsupportedFormat(format!(
        "{} needs the `xlsx` feature",
        path.display()
    )))
}
