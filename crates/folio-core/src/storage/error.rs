//! Storage Error Types

use thiserror::Error;

/// Error raised by a storage backend during a read or a write step
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Corrupted data detected: {0}")]
    CorruptedData(String),

    #[error("Concurrent access error: {0}")]
    ConcurrentAccess(String),

    #[error("Injected failure: {0}")]
    Injected(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Create a generic backend error
    pub fn backend<S: Into<String>>(msg: S) -> Self {
        Self::Backend(msg.into())
    }

    /// Create a constraint violation error
    pub fn constraint<S: Into<String>>(msg: S) -> Self {
        Self::Constraint(msg.into())
    }

    /// Check if the error is worth retrying at a higher level
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentAccess(_))
    }
}
