//! Error types for the watch table model and evaluator protocol.
use crate::models::row::RowId;
use thiserror::Error;

/// Top-level error type for watchlist operations.
#[derive(Error, Debug)]
pub enum WatchlistError {
    #[error("Protocol violation: {0}")]
    Protocol(#[from] ProtocolViolation),

    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown row: {0}")]
    UnknownRow(RowId),
}

/// A response batch that does not line up with the rows it was meant for.
///
/// This is an ordering bug between the table and its evaluator, never a user
/// error; the batch is rejected as a whole.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolViolation {
    #[error("batch has {received} entries but the table has {expected} evaluable rows")]
    LengthMismatch { expected: usize, received: usize },

    #[error("batch entry {index} is for '{received}' but the row holds '{expected}'")]
    ExpressionMismatch {
        index: usize,
        expected: String,
        received: String,
    },
}
