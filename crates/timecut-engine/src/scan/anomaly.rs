//! Conditions the scan reports without stopping.

use thiserror::Error;

use crate::grid::CellRef;

/// A non-fatal problem found while scanning. The scan always finishes the
/// grid; these are collected in [`super::ScanOutcome::anomalies`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanAnomaly {
    #[error("Malformed metadata block at {at}: {reason}")]
    MalformedMetadataBlock { at: CellRef, reason: BlockDefect },

    #[error("Metadata block opened at {opened_at} is never closed")]
    UnterminatedMetadataBlock { opened_at: CellRef },

    #[error("Skipped {kind} cell at {at}")]
    NonTextCell { at: CellRef, kind: &'static str },

    #[error("No courses requested; every course cell will be cleared")]
    AllowListEmpty,

    #[error("Course {abbrev} at {at} replaces an earlier entry")]
    DuplicateCourse { abbrev: String, at: CellRef },
}

/// Why a metadata block was dropped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockDefect {
    #[error("close marker without an open block")]
    UnmatchedClose,

    #[error("open marker inside an open block")]
    NestedOpen,

    #[error("more than four fields")]
    TooManyFields,

    #[error("block has no abbreviation")]
    Empty,
}
