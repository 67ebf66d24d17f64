//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the API service
///
/// Each variant maps to a distinct, stable HTTP status so callers can
/// tell the failure kinds apart.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Duplicate username or email
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials or a missing, invalid, or expired token
    #[error("{0}")]
    Unauthorized(&'static str),

    /// Locked account
    #[error("{0}")]
    Forbidden(String),

    /// Missing employee or user
    #[error("{0}")]
    NotFound(String),

    /// Malformed input fields
    #[error("{0}")]
    Validation(String),

    /// Internal server error; detail is logged, never surfaced
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.to_string()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
