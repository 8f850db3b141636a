//! Error types for the accounts handlers.

use accounts_database::UserError;
use thiserror::Error;

/// Status codes surfaced to remote callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    InvalidArgument,
    Unauthenticated,
    NotFound,
    Internal,
}

impl Code {
    pub fn as_str(&self) -> &'static str {
        match self {
            Code::InvalidArgument => "INVALID_ARGUMENT",
            Code::Unauthenticated => "UNAUTHENTICATED",
            Code::NotFound => "NOT_FOUND",
            Code::Internal => "INTERNAL",
        }
    }
}

/// Handler-level errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request failed validation. Carries the fixed caller-facing message only.
    #[error("{0}")]
    InvalidArgument(&'static str),

    #[error("Unauthenticated")]
    Unauthenticated,

    /// The consumer of a streamed response went away.
    #[error("stream closed by receiver")]
    StreamClosed,

    /// Store and mapping failures, passed through as they were raised.
    #[error(transparent)]
    Store(#[from] UserError),
}

impl ServiceError {
    pub fn code(&self) -> Code {
        match self {
            ServiceError::InvalidArgument(_) => Code::InvalidArgument,
            ServiceError::Unauthenticated => Code::Unauthenticated,
            ServiceError::Store(UserError::UserNotFound) => Code::NotFound,
            ServiceError::StreamClosed | ServiceError::Store(_) => Code::Internal,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_messages() {
        let err = ServiceError::InvalidArgument("Invalid email or code");
        assert_eq!(err.code(), Code::InvalidArgument);
        assert_eq!(err.to_string(), "Invalid email or code");

        assert_eq!(ServiceError::Unauthenticated.to_string(), "Unauthenticated");
        assert_eq!(ServiceError::Unauthenticated.code().as_str(), "UNAUTHENTICATED");

        let not_found = ServiceError::from(UserError::UserNotFound);
        assert_eq!(not_found.code(), Code::NotFound);
        assert_eq!(not_found.to_string(), "no rows in result set");

        let duplicate = ServiceError::from(UserError::EmailAlreadyExists("users.email".into()));
        assert_eq!(duplicate.code(), Code::Internal);
        assert_eq!(ServiceError::StreamClosed.code(), Code::Internal);
    }
}
