//! Snapshot Errors

use thiserror::Error;

/// Reasons a snapshot is rejected by `restore`
///
/// Line numbers are 1-based positions in the snapshot text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("snapshot truncated: expected {expected}")]
    Truncated { expected: &'static str },

    #[error("line {line}: invalid count {found:?}")]
    InvalidCount { line: usize, found: String },

    #[error("line {line}: invalid ttl {found:?}")]
    InvalidTtl { line: usize, found: String },

    #[error("line {line}: invalid escape sequence")]
    InvalidEscape { line: usize },

    #[error("record {id:?} has no fields")]
    EmptyRecord { id: String },

    #[error("record {id:?} appears more than once")]
    DuplicateRecord { id: String },

    #[error("record {id:?} repeats field {field:?}")]
    DuplicateField { id: String, field: String },

    #[error("ttl given for unknown record {id:?}")]
    UnknownTtlRecord { id: String },

    #[error("ttl given twice for record {id:?}")]
    DuplicateTtl { id: String },

    #[error("line {line}: unexpected data after ttl section")]
    TrailingData { line: usize },
}
