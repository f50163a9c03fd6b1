//! Timetable scanning engine.
//!
//! One pass over the grid, rows then columns. For each text cell:
//!
//! 1. The [`CutRegion`] sees it first. Markers and the cells inside a
//!    metadata block are blanked; the block's cells become course fields.
//! 2. Column titles are left alone.
//! 3. Time ranges are rewritten by [`normalize_time`].
//! 4. Everything else is kept or cleared against the [`AllowList`].
//!
//! Problems with the data are collected as [`ScanAnomaly`] values and the pass
//! always runs to the end of the grid.

mod anomaly;
mod config;
mod course;
mod filter;
mod region;
mod time;
mod tokens;

pub use anomaly::{BlockDefect, ScanAnomaly};
pub use config::{DEFAULT_CLOSE_MARKER, DEFAULT_COLUMN_TITLES, DEFAULT_OPEN_MARKER, ScanConfig};
pub use course::{BuilderState, Course, CourseBuilder, CourseRegistry, FieldOverflow};
pub use filter::{AllowList, Verdict, apply, classify};
pub use region::{Closed, CutRegion, Step};
pub use time::{is_time_label, looks_like_range, normalize_time};
pub use tokens::{strip_decoration, tokenize};

use tracing::{debug, info, warn};

use crate::grid::{CellRef, CellValue, Grid, row_major};

/// Counters for one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub kept: usize,
    pub cleared: usize,
    pub times_normalized: usize,
    pub titles: usize,
    pub metadata_cells: usize,
}

/// Everything a run produces besides the edits to the grid.
#[derive(Clone, Debug, Default)]
pub struct ScanOutcome {
    pub registry: CourseRegistry,
    /// Markers and fields of metadata blocks, in scan order.
    pub metadata_cells: Vec<CellRef>,
    pub anomalies: Vec<ScanAnomaly>,
    pub stats: ScanStats,
}

/// The grid filter. Holds only read-only inputs; each [`run`](Self::run)
/// starts from a fresh region and registry.
pub struct TimetableFilter<'a> {
    config: &'a ScanConfig,
    allow: &'a AllowList,
}

impl<'a> TimetableFilter<'a> {
    pub fn new(config: &'a ScanConfig, allow: &'a AllowList) -> Self {
        TimetableFilter { config, allow }
    }

    /// Filter `grid` in place and return the courses found in it.
    pub fn run(&self, grid: &Grid) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        let mut region = CutRegion::default();

        if self.allow.is_empty() {
            report(&mut outcome, ScanAnomaly::AllowListEmpty);
        }

        for at in row_major(grid) {
            let Some(mut cell) = grid.get_mut(&at) else {
                continue;
            };

            let text = match &cell.value {
                CellValue::Text(s) => s.clone(),
                CellValue::Empty => continue,
                other => {
                    let kind = other.kind();
                    debug!(cell = %at, kind, "skipping non-text cell");
                    outcome.anomalies.push(ScanAnomaly::NonTextCell { at, kind });
                    continue;
                }
            };
            let tokens = tokenize(&text);

            let step = region.step(at, &tokens, &text, self.config);
            if step != Step::Pass {
                outcome.metadata_cells.push(at);
            }
            match step {
                Step::Open { dropped } => {
                    cell.value = CellValue::Empty;
                    if let Some(opened_at) = dropped {
                        report(
                            &mut outcome,
                            ScanAnomaly::MalformedMetadataBlock {
                                at: opened_at,
                                reason: BlockDefect::NestedOpen,
                            },
                        );
                    }
                    continue;
                }
                Step::Close(closed) => {
                    cell.value = CellValue::Empty;
                    self.close_block(&mut outcome, at, closed);
                    continue;
                }
                Step::Field { overflow } => {
                    debug!(cell = %at, value = %text, "recording course field");
                    cell.value = CellValue::Empty;
                    outcome.stats.metadata_cells += 1;
                    if let Some(overflow) = overflow {
                        warn!(cell = %at, "{}", overflow);
                        report(
                            &mut outcome,
                            ScanAnomaly::MalformedMetadataBlock {
                                at,
                                reason: BlockDefect::TooManyFields,
                            },
                        );
                    }
                    continue;
                }
                Step::Pass => {}
            }

            if self.config.is_title(&tokens) {
                outcome.stats.titles += 1;
                continue;
            }

            if let Some(label) = normalize_time(&text) {
                cell.value = CellValue::Text(label);
                outcome.stats.times_normalized += 1;
                continue;
            }

            let verdict = classify(&tokens, self.allow);
            match verdict {
                Verdict::Keep(_) => outcome.stats.kept += 1,
                Verdict::Clear => outcome.stats.cleared += 1,
            }
            apply(&mut cell, &verdict);
        }

        if let Some(opened_at) = region.finish() {
            report(&mut outcome, ScanAnomaly::UnterminatedMetadataBlock { opened_at });
        }

        info!(
            courses = outcome.registry.len(),
            kept = outcome.stats.kept,
            cleared = outcome.stats.cleared,
            times = outcome.stats.times_normalized,
            anomalies = outcome.anomalies.len(),
            "scan finished"
        );
        outcome
    }

    fn close_block(&self, outcome: &mut ScanOutcome, at: CellRef, closed: Closed) {
        match closed {
            Closed::Course(course) => {
                let abbrev = course.abbrev.clone();
                debug!(cell = %at, course = %abbrev, "committing course");
                if outcome.registry.commit(course).is_some() {
                    report(outcome, ScanAnomaly::DuplicateCourse { abbrev, at });
                }
            }
            // Overflow was already reported when it happened.
            Closed::Dropped(BlockDefect::TooManyFields) => {}
            Closed::Dropped(reason) => {
                report(outcome, ScanAnomaly::MalformedMetadataBlock { at, reason });
            }
        }
    }
}

fn report(outcome: &mut ScanOutcome, anomaly: ScanAnomaly) {
    warn!("{}", anomaly);
    outcome.anomalies.push(anomaly);
}
