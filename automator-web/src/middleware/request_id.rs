//! Request correlation
//!
//! Every request carries an `X-Request-ID`, either the one the client sent or
//! a fresh UUID. The id is stored in the request extensions, echoed on the
//! response and recorded on a `request` span together with the matched route
//! and the process or task name the route addresses.

use axum::{
    body::Body,
    extract::{FromRequestParts, MatchedPath},
    http::{request::Parts, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use std::fmt;
use tracing::Instrument;
use uuid::Uuid;

/// Request ID header name
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Route parameter naming the addressed process or task
const ENTITY_PARAM: &str = "{name}";

/// Correlation id of the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The client's id when present and usable as a header value, else a new one
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Self(value.to_string()))
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of the process or task a request addresses.
///
/// Lines the matched route template up with the concrete path and returns
/// the segment sitting where the template has `{name}`.
pub fn entity_name(route: &str, path: &str) -> Option<String> {
    let template = route.trim_matches('/').split('/');
    let concrete = path.trim_matches('/').split('/');

    template
        .zip(concrete)
        .find(|(param, _)| *param == ENTITY_PARAM)
        .map(|(_, segment)| segment.to_string())
        .filter(|segment| !segment.is_empty())
}

/// Attach a request id and a correlated span to every request.
///
/// Must be added with `Router::layer` so the matched route is known.
pub async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let request_id = RequestId::from_headers(request.headers());

    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string());
    let entity = route
        .as_deref()
        .and_then(|route| entity_name(route, request.uri().path()));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        route = route.as_deref().unwrap_or("unmatched"),
        entity = entity.as_deref().unwrap_or("-"),
    );

    request.extensions_mut().insert(request_id.clone());

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Handlers receive the id set by [`request_id_middleware`], or a fresh one
/// when the middleware is not installed
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestId>()
            .cloned()
            .unwrap_or_default())
    }
}
