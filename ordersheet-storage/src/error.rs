//! Error types for the cache layer.

use thiserror::Error;

/// Result type for cache operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in cache operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend is unavailable or refused the operation.
    #[error("cache backend error: {0}")]
    Backend(String),

    /// A thread panicked while holding the connection lock.
    #[error("cache lock poisoned")]
    LockPoisoned,
}
