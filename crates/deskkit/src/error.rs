//! Result and error types for deskkit.

use thiserror::Error;

/// Result type for deskkit operations
pub type DeskResult<T> = Result<T, DeskError>;

/// Errors surfaced by configuration loading and storage backends
#[derive(Debug, Error)]
pub enum DeskError {
    /// Storage backend failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Configuration file could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeskError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Errors raised by a [`Storage`](crate::storage::Storage) backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying file I/O failed
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Payload could not be encoded or decoded
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend refused the operation
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Error message
        message: String,
    },
}

impl StorageError {
    /// Create an unavailable error
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
