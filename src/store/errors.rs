//! # Store Errors
//!
//! Error types for the data access layer.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Data access errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// A row violated a table constraint (NOT NULL, FOREIGN KEY, ...)
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Any other SQLite failure
    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    /// The connection mutex was poisoned by a panicking holder
    #[error("Store connection lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Whether the error was caused by the data rather than the store
    pub fn is_constraint(&self) -> bool {
        matches!(self, StoreError::Constraint(_))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref failure, ref message)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                let detail = message
                    .clone()
                    .unwrap_or_else(|| failure.to_string());
                StoreError::Constraint(detail)
            }
            other => StoreError::Database(other),
        }
    }
}
