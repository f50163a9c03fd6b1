//! Cut region state machine.
//!
//! A metadata block starts at a cell holding the open marker and ends at a
//! cell holding the close marker. Every cell in between belongs to the block.

use super::anomaly::BlockDefect;
use super::config::ScanConfig;
use super::course::{Course, CourseBuilder, FieldOverflow};
use crate::grid::CellRef;

#[derive(Clone, Debug, Default)]
pub enum CutRegion {
    #[default]
    Outside,
    Inside {
        opened_at: CellRef,
        builder: CourseBuilder,
    },
    /// The block went bad; cells are swallowed until it closes.
    Abandoned { opened_at: CellRef },
}

/// What the region did with one cell.
#[derive(Debug, PartialEq)]
pub enum Step {
    /// The cell opened a block. `dropped` names a block left open before it.
    Open { dropped: Option<CellRef> },
    /// The cell closed a block.
    Close(Closed),
    /// The cell was a field of the open block.
    Field { overflow: Option<FieldOverflow> },
    /// The cell is outside any block.
    Pass,
}

#[derive(Debug, PartialEq)]
pub enum Closed {
    Course(Course),
    Dropped(BlockDefect),
}

impl CutRegion {
    pub fn is_inside(&self) -> bool {
        !matches!(self, CutRegion::Outside)
    }

    /// Feed one text cell. Markers win over every other reading of a cell.
    pub fn step(&mut self, at: CellRef, tokens: &[String], text: &str, config: &ScanConfig) -> Step {
        if config.opens(tokens) {
            // An abandoned block was reported when it overflowed.
            let dropped = match std::mem::take(self) {
                CutRegion::Inside { opened_at, .. } => Some(opened_at),
                CutRegion::Outside | CutRegion::Abandoned { .. } => None,
            };
            *self = CutRegion::Inside {
                opened_at: at,
                builder: CourseBuilder::new(),
            };
            return Step::Open { dropped };
        }

        if config.closes(tokens) {
            return Step::Close(match std::mem::take(self) {
                CutRegion::Outside => Closed::Dropped(BlockDefect::UnmatchedClose),
                CutRegion::Abandoned { .. } => Closed::Dropped(BlockDefect::TooManyFields),
                CutRegion::Inside { builder, .. } => match builder.finish() {
                    Some(course) => Closed::Course(course),
                    None => Closed::Dropped(BlockDefect::Empty),
                },
            });
        }

        match self {
            CutRegion::Outside => Step::Pass,
            CutRegion::Abandoned { .. } => Step::Field { overflow: None },
            CutRegion::Inside { opened_at, builder } => match builder.record(text) {
                Ok(()) => Step::Field { overflow: None },
                Err(overflow) => {
                    let opened_at = *opened_at;
                    *self = CutRegion::Abandoned { opened_at };
                    Step::Field {
                        overflow: Some(overflow),
                    }
                }
            },
        }
    }

    /// Where the still-open block started, if the grid ended inside one.
    pub fn finish(self) -> Option<CellRef> {
        match self {
            CutRegion::Outside => None,
            CutRegion::Inside { opened_at, .. } | CutRegion::Abandoned { opened_at } => {
                Some(opened_at)
            }
        }
    }
}
