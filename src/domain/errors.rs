//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Storage error: {0}")]
    Storage(String),

    /// Stored snapshot could not be encoded or decoded.
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("UI error: {0}")]
    Ui(String),
}
