//! Error types for the gateway layer

use accounts_users::{Code, ServiceError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Gateway error types. The message is what the caller sees.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::InvalidArgument(_) => Code::InvalidArgument.as_str(),
            GatewayError::Unauthenticated(_) => Code::Unauthenticated.as_str(),
            GatewayError::NotFound(_) => Code::NotFound.as_str(),
            GatewayError::Internal(_) => Code::Internal.as_str(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            GatewayError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error body shared by unary responses and the trailing line of a failed stream.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<&GatewayError> for ErrorResponse {
    fn from(error: &GatewayError) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<ServiceError> for GatewayError {
    fn from(error: ServiceError) -> Self {
        let message = error.to_string();
        match error.code() {
            Code::InvalidArgument => GatewayError::InvalidArgument(message),
            Code::Unauthenticated => GatewayError::Unauthenticated(message),
            Code::NotFound => GatewayError::NotFound(message),
            Code::Internal => GatewayError::Internal(message),
        }
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(error: sqlx::Error) -> Self {
        GatewayError::Internal(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accounts_users::UserError;

    #[test]
    fn test_service_errors_map_to_status_codes() {
        let err = GatewayError::from(ServiceError::InvalidArgument("Invalid email or code"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid email or code");

        let err = GatewayError::from(ServiceError::Unauthenticated);
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.code(), "UNAUTHENTICATED");

        let err = GatewayError::from(ServiceError::Store(UserError::UserNotFound));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = GatewayError::from(ServiceError::StreamClosed);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
