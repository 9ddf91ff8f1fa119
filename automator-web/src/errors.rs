//! Web-specific error types and conversions
//!
//! Every error leaves the service as
//! `{"error": {"code": ..., "message": ..., "status": ...}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Web-specific error type for HTTP API operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WebError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Unprocessable entity: {message}")]
    UnprocessableEntity { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

impl WebError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        WebError::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        WebError::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        WebError::Conflict {
            message: message.into(),
        }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        WebError::UnprocessableEntity {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        WebError::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            WebError::NotFound { .. } => StatusCode::NOT_FOUND,
            WebError::Conflict { .. } => StatusCode::CONFLICT,
            WebError::UnprocessableEntity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            WebError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            WebError::BadRequest { .. } => "BAD_REQUEST",
            WebError::NotFound { .. } => "NOT_FOUND",
            WebError::Conflict { .. } => "CONFLICT",
            WebError::UnprocessableEntity { .. } => "UNPROCESSABLE_ENTITY",
            WebError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// The client-facing message without the status prefix
    pub fn message(&self) -> &str {
        match self {
            WebError::BadRequest { message }
            | WebError::NotFound { message }
            | WebError::Conflict { message }
            | WebError::UnprocessableEntity { message }
            | WebError::Internal { message } => message,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal details stay in the logs
        let message = match &self {
            WebError::Internal { message } => {
                tracing::error!(error = %message, "Internal server error");
                "Internal server error"
            }
            _ => self.message(),
        };

        let body = json!({
            "error": {
                "code": self.error_code(),
                "message": message,
                "status": status.as_u16()
            }
        });

        (status, Json(body)).into_response()
    }
}
