//! Storage-specific error types.
//!
//! All result log operations return [`StorageError`] on failure. The
//! monitor logs these and carries on with the next cycle.

use thiserror::Error;

/// Errors that can occur while appending to the result log.
#[derive(Debug, Error)]
pub enum StorageError {
    /// File could not be opened, inspected or written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Row could not be encoded as CSV.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Internal error (e.g., flushing the encode buffer).
    #[error("internal error: {0}")]
    Internal(String),
}
