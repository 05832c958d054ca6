//! Error types for local store operations

use std::path::PathBuf;

/// Error types for local store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the store file failed
    #[error("Local store IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be converted to or from JSON
    #[error("Local store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store file exists but is not a JSON object
    #[error("Local store at {path:?} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// The temp file could not be renamed over the store file
    #[error("Failed to persist local store: {0}")]
    Persist(String),
}
