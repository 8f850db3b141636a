//! Error types for the database layer

use thiserror::Error;

/// General database error
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),
}

/// Errors raised by the user store and the row mapper.
///
/// Driver failures are carried through untouched in [`UserError::DatabaseError`];
/// only the "no rows" signal and unique-key violations get their own variants so
/// callers can tell them apart from real I/O failures.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("no rows in result set")]
    UserNotFound,

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Invalid user row: {0}")]
    InvalidRow(String),

    #[error("Database error: {0}")]
    DatabaseError(#[source] sqlx::Error),
}

impl UserError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, UserError::UserNotFound)
    }
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => UserError::UserNotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                UserError::EmailAlreadyExists(db_err.message().to_string())
            }
            other => UserError::DatabaseError(other),
        }
    }
}
