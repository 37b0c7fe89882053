//! Error types for nc-record.

use thiserror::Error;

/// Errors raised while encoding, storing or decoding record tables.
#[derive(Debug, Error)]
pub enum RecordError {
    /// A row's length disagrees with the length implied by its own node
    /// count and the table's run parameters.
    #[error("row {row}: expected {expected} fields, found {got}")]
    LengthMismatch { row: usize, expected: usize, got: usize },

    #[error("row {row}: {reason}")]
    Malformed { row: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl RecordError {
    pub(crate) fn malformed(row: usize, reason: impl Into<String>) -> Self {
        Self::Malformed { row, reason: reason.into() }
    }
}

/// Alias for `Result<T, RecordError>`.
pub type RecordResult<T> = Result<T, RecordError>;
