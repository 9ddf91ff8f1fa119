//! Main application configuration and router setup

use automator_web::{cors_layer_with_config, request_id_middleware, CorsConfig};
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{context::AppContext, handlers};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Enable CORS middleware
    pub enable_cors: bool,
    /// Enable request ID tracking
    pub enable_request_id: bool,
    /// Enable request tracing
    pub enable_tracing: bool,
    /// API path prefix, empty to serve the API at the root
    pub api_prefix: String,
    pub cors: CorsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            enable_request_id: true,
            enable_tracing: true,
            api_prefix: String::new(),
            cors: CorsConfig::default(),
        }
    }
}

/// Create the complete REST API application
///
/// No fallback is installed, so callers can add their own (a static UI or a
/// JSON not-found handler).
pub fn create_rest_app(context: AppContext, config: AppConfig) -> Router {
    let app = Router::new()
        // Health endpoint (no prefix)
        .route("/health", get(handlers::health_check));

    // axum cannot nest at "/", so a bare slash means no prefix
    let prefix = config.api_prefix.trim_end_matches('/');
    let app = if prefix.is_empty() {
        app.merge(create_api_router())
    } else {
        app.nest(prefix, create_api_router())
    };

    let mut app = app.with_state(context);

    // Add middleware layers (applied in reverse order)
    if config.enable_cors {
        app = app.layer(cors_layer_with_config(config.cors));
    }

    if config.enable_request_id {
        app = app.layer(middleware::from_fn(request_id_middleware));
    }

    if config.enable_tracing {
        app = app.layer(TraceLayer::new_for_http());
    }

    app
}

fn create_api_router() -> Router<AppContext> {
    Router::new()
        // Process endpoints
        .route("/processes", get(handlers::list_processes))
        .route(
            "/processes/{name}",
            get(handlers::get_process).patch(handlers::update_process),
        )
        .route("/processes/{name}/start", post(handlers::start_process))
        .route("/processes/{name}/stop", post(handlers::stop_process))
        // Singular form used by the bundled web UI
        .route("/process/{name}", patch(handlers::update_process))
        // Task endpoints
        .route("/tasks", get(handlers::list_tasks))
        .route(
            "/tasks/{name}",
            get(handlers::get_task)
                .post(handlers::start_task)
                .patch(handlers::update_task),
        )
}
