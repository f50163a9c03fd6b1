//! Workbook model and file I/O.

mod io;
mod state;

pub use io::Format;
pub use state::{Sheet, Workbook, sheet_index_for_year};
