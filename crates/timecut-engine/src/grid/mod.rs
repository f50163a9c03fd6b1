//! Timetable grid model.

mod cell;
mod cell_ref;

pub use cell::{
    Alignment, Cell, CellValue, Fill, Grid, Rgb, format_number, grid_from_rows,
    grid_from_text_rows, new_grid, row_major,
};
pub use cell_ref::CellRef;
