//! REST API specific error types and conversions

use automator_core::AutomatorError;
use automator_web::WebError;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// REST API specific error type
#[derive(Error, Debug)]
pub enum RestError {
    #[error(transparent)]
    Automator(#[from] AutomatorError),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Web error")]
    Web(#[from] WebError),
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

impl RestError {
    /// Map to the web error carrying the HTTP status
    pub fn to_web_error(&self) -> WebError {
        match self {
            RestError::Automator(err) => match err {
                AutomatorError::NotFound { .. } => WebError::not_found(err.to_string()),
                AutomatorError::AlreadyRunning { run_id, .. } => {
                    WebError::conflict(format!("Task id {} already running", run_id))
                }
                AutomatorError::InvalidParameter { .. } => WebError::bad_request(err.to_string()),
                AutomatorError::DuplicateName { .. } => WebError::internal(err.to_string()),
            },
            RestError::InvalidBody(message) => WebError::unprocessable(message.clone()),
            RestError::Web(err) => err.clone(),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        self.to_web_error().into_response()
    }
}
