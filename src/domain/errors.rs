//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// A record file is missing or unreadable.
    #[error("Failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    /// A record file is not valid JSON for its collection.
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}
