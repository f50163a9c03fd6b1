//! timecut-core - Workbook model, storage and calendar export around the
//! timetable scanning engine.

pub mod calendar;
pub mod error;
pub mod pipeline;
pub mod storage;
pub mod workbook;

pub use error::{Result, TimecutError};
pub use pipeline::{FilterJob, HookContext, JobReport, ScanHook};
pub use workbook::{Sheet, Workbook};

pub use timecut_engine::scan::{AllowList, CourseRegistry, ScanConfig};
