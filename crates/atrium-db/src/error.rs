//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error (includes pool acquire timeouts)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl DbError {
    /// Whether this error is a timeout waiting for the backend
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Sqlx(sqlx::Error::PoolTimedOut))
    }
}

/// Result alias for database operations
pub type DbResult<T> = Result<T, DbError>;
