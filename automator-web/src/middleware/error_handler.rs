use axum::response::IntoResponse;

use crate::errors::WebError;

/// Fallback for unknown routes
pub async fn handle_not_found() -> impl IntoResponse {
    WebError::not_found("The requested resource was not found")
}

/// Convenience function to convert any error to WebError
pub fn internal_error<E: std::fmt::Display>(err: E) -> WebError {
    WebError::internal(err.to_string())
}
