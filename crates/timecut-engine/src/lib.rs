//! timecut_engine - Timetable grid model and scanning engine.
//!
//! - [`grid`] - Cells, positions and the shared sparse grid
//! - [`scan`] - The single-pass filter that extracts course metadata,
//!   normalizes times and keeps only requested courses

pub mod grid;
pub mod scan;

pub use grid::{Cell, CellRef, CellValue, Grid};
pub use scan::{AllowList, Course, CourseRegistry, ScanAnomaly, ScanConfig, ScanOutcome, TimetableFilter};
