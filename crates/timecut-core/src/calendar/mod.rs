//! Calendar export of the courses that survived filtering.
//!
//! Runs after the scan. Each row is read left to right: a date cell sets the
//! row's date, a normalized `H:00` cell sets the row's time, and every
//! requested course token after both gives one [`Lecture`]. Cells the scan
//! consumed as course metadata are ignored.

mod ics;
mod script;

pub use ics::{IcsExport, escape_text, render_ics};
pub use script::{ScriptExport, ScriptRenderer};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use timecut_engine::grid::{CellValue, Grid, row_major};
use timecut_engine::scan::{AllowList, ScanConfig, ScanOutcome, is_time_label, tokenize};
use tracing::{debug, warn};

/// One timetabled session of a course.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lecture {
    pub abbrev: String,
    pub name: String,
    pub tutor: String,
    pub location: String,
    pub date: NaiveDate,
    /// Normalized label, e.g. `15:00`
    pub time: String,
    pub start: NaiveDateTime,
    pub year: u32,
}

/// Row-local position while reading a row.
#[derive(Default)]
struct RowCursor {
    row: usize,
    date: Option<NaiveDate>,
    time: Option<(String, NaiveTime)>,
}

/// Collect lectures from a filtered grid.
pub fn collect_lectures(
    grid: &Grid,
    outcome: &ScanOutcome,
    allow: &AllowList,
    config: &ScanConfig,
    year: u32,
) -> Vec<Lecture> {
    let mut lectures = Vec::new();
    let mut cursor = RowCursor::default();

    for at in row_major(grid) {
        if at.row != cursor.row {
            cursor = RowCursor {
                row: at.row,
                ..RowCursor::default()
            };
        }
        if outcome.metadata_cells.binary_search(&at).is_ok() {
            continue;
        }
        let Some(cell) = grid.get(&at) else {
            continue;
        };

        let text = match &cell.value {
            CellValue::Date(dt) => {
                cursor.date = Some(dt.date());
                continue;
            }
            CellValue::Text(s) => s.as_str(),
            CellValue::Empty | CellValue::Number(_) => continue,
        };
        let tokens = tokenize(text);
        if config.is_title(&tokens) {
            continue;
        }

        if is_time_label(text) {
            cursor.time = parse_label(text).map(|t| (text.trim().to_string(), t));
            if cursor.time.is_none() {
                warn!(cell = %at, label = text, "time label is not a valid hour");
            }
            continue;
        }

        for abbrev in allow.intersect(&tokens) {
            let Some(course) = outcome.registry.get(abbrev) else {
                warn!(cell = %at, course = abbrev, "no metadata for course; skipping");
                continue;
            };
            let (Some(date), Some((label, time))) = (cursor.date, cursor.time.as_ref()) else {
                warn!(cell = %at, course = abbrev, "no date or time earlier in row; skipping");
                continue;
            };
            let lecture = Lecture {
                abbrev: course.abbrev.clone(),
                name: course.name.clone(),
                tutor: course.tutor.clone(),
                location: course.location.clone(),
                date,
                time: label.clone(),
                start: date.and_time(*time),
                year,
            };
            debug!(cell = %at, ?lecture, "collected lecture");
            lectures.push(lecture);
        }
    }

    lectures
}

fn parse_label(label: &str) -> Option<NaiveTime> {
    let (hour, minute) = label.trim().split_once(':')?;
    NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)
}
