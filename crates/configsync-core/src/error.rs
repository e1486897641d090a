//! Error types for configuration storage.

use thiserror::Error;

/// Errors that can occur while storing or loading a configuration file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file extension does not select a supported encoding.
    #[error("Invalid config file type ({path}) provided")]
    InvalidFileType {
        /// The rejected path.
        path: String,
    },

    /// YAML encoding or decoding failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;
