//! Error types for Timecut core.

use thiserror::Error;

use rhai::EvalAltResult;

/// Failures around the scan: loading, selecting, saving and exporting.
#[derive(Error, Debug)]
pub enum TimecutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("No file path set")]
    NoFilePath,

    #[error("Workbook has no sheets")]
    NoSheets,

    #[error("Year must be at least 1")]
    InvalidYear,

    #[error("Year {year} needs sheet {sheet} but the workbook has {available}")]
    YearOutOfRange {
        year: u32,
        sheet: usize,
        available: usize,
    },

    #[error("CSV file is empty")]
    EmptyCsv,

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Template error: {0}")]
    Template(
        #[from]
        #[source]
        Box<EvalAltResult>,
    ),

    #[error("Template compile error: {0}")]
    TemplateCompile(String),

    #[error("Spreadsheet import error: {0}")]
    Xlsx(String),
}

pub type Result<T> = std::result::Result<T, TimecutError>;
