//! Common types for REST API requests and responses

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{RestError, RestResult};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub started_at: DateTime<Utc>,
    pub version: String,
    pub processes: EntityCounts,
    pub tasks: EntityCounts,
}

/// Registered and currently running entities of one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub total: usize,
    pub running: usize,
}

/// Decode an optional JSON request body.
///
/// An empty body yields the default value; anything else must be valid JSON
/// for `T` or the request is rejected as unprocessable.
pub fn parse_optional_body<T>(body: &Bytes) -> RestResult<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| RestError::InvalidBody(e.to_string()))
}
