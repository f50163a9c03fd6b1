//! Storage formats for workbooks.

mod csv_io;
mod parser;
#[cfg(feature = "xlsx")]
mod xlsx;
mod writer;

pub use csv_io::{parse_csv, parse_csv_content, write_csv, write_csv_content};
pub use parser::{parse_grd, parse_grd_content};
pub use writer::{write_grd, write_grd_content};
#[cfg(feature = "xlsx")]
pub use xlsx::parse_xlsx;
