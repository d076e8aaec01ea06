//! Error types for SQLite storage

use thiserror::Error;

/// SQLite storage error type
#[derive(Error, Debug)]
pub enum SqliteError {
    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Schema/migration error
    #[error("Schema error: {0}")]
    Schema(String),

    /// Blocking task failed to complete
    #[error("Task error: {0}")]
    Task(String),

    /// Underlying rusqlite error
    #[error("SQLite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
}

/// Result type for SQLite operations
pub type SqliteResult<T> = Result<T, SqliteError>;

impl From<SqliteError> for folio_core::StorageError {
    fn from(err: SqliteError) -> Self {
        match err {
            SqliteError::Connection(msg) => Self::Backend(msg),
            SqliteError::Schema(msg) => Self::Backend(format!("Schema: {}", msg)),
            SqliteError::Task(msg) => Self::Backend(format!("Task: {}", msg)),
            SqliteError::Rusqlite(e) => classify(e),
        }
    }
}

fn classify(err: rusqlite::Error) -> folio_core::StorageError {
    use rusqlite::ErrorCode;

    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => folio_core::StorageError::Constraint(err.to_string()),
        Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => {
            folio_core::StorageError::ConcurrentAccess(err.to_string())
        }
        Some(ErrorCode::DatabaseCorrupt) | Some(ErrorCode::NotADatabase) => {
            folio_core::StorageError::CorruptedData(err.to_string())
        }
        _ => folio_core::StorageError::Backend(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::StorageError;

    #[test]
    fn test_busy_maps_to_concurrent_access() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            Some("database is locked".to_string()),
        );
        let mapped: StorageError = SqliteError::from(err).into();
        assert!(mapped.is_retryable());
    }

    #[test]
    fn test_constraint_maps_to_constraint() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT),
            None,
        );
        let mapped: StorageError = SqliteError::from(err).into();
        assert!(matches!(mapped, StorageError::Constraint(_)));
    }
}
