//! Storage error types.

use thiserror::Error;

/// Errors that can occur when talking to a key-value backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    Open(String),

    /// Failed to read a key.
    #[error("Failed to read key {key}: {reason}")]
    Read { key: String, reason: String },

    /// Failed to write a key.
    #[error("Failed to write key {key}: {reason}")]
    Write { key: String, reason: String },

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StorageError {
    /// Build a read error for `key`.
    pub fn read(key: &str, reason: impl ToString) -> Self {
        Self::Read {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Build a write error for `key`.
    pub fn write(key: &str, reason: impl ToString) -> Self {
        Self::Write {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}
