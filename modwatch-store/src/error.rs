//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The state file exists but could not be parsed.
    #[error("corrupt state file {}: {source}", path.display())]
    Corrupt {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser error.
        source: serde_json::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
