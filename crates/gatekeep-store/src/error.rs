//! Storage error types.

use thiserror::Error;

/// Errors from reading or writing the policy file. Not locally recoverable;
/// callers must treat a failed read as an indeterminate decision (and not
/// block on it).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
