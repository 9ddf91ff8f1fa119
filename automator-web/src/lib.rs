//! # Automator Web Utilities
//!
//! Reusable middleware and error types for the automation HTTP API.
//!
//! ## Example
//!
//! ```rust,no_run
//! use axum::{middleware, routing::get, Router};
//! use automator_web::{cors_layer, handle_not_found, request_id_middleware};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let app: Router = Router::new()
//!     .route("/health", get(|| async { "ok" }))
//!     .fallback(handle_not_found)
//!     .layer(middleware::from_fn(request_id_middleware))
//!     .layer(cors_layer());
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await.unwrap();
//! axum::serve(listener, app).await.unwrap();
//! # }
//! ```

pub mod errors;
pub mod middleware;

pub use errors::{WebError, WebResult};
pub use middleware::{
    cors_layer, cors_layer_with_config, entity_name, handle_not_found, request_id_middleware,
    CorsConfig, RequestId, REQUEST_ID_HEADER,
};
