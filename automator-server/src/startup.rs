//! Server startup and shutdown logic

use anyhow::Result;
use axum::{routing::get, Router};
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use automator_config::{AutomatorConfig, ServerConfig};
use automator_rest_api::{create_rest_app, AppConfig as RestAppConfig};
use automator_web::handle_not_found;

use crate::services::{init_logging, ServiceContainer};

/// Server application struct
#[derive(Debug)]
pub struct Server {
    config: AutomatorConfig,
    services: ServiceContainer,
}

impl Server {
    /// Create a new server instance
    pub async fn new(config: AutomatorConfig) -> Result<Self> {
        // Initialize logging first
        init_logging(&config.logging)?;

        let services = ServiceContainer::new(&config).await?;

        Ok(Self { config, services })
    }

    pub fn services(&self) -> &ServiceContainer {
        &self.services
    }

    /// Build the complete application router
    pub fn build_app(&self) -> Router {
        let rest_app = create_rest_app(
            self.services.rest_context(),
            rest_app_config(&self.config.server),
        );

        match &self.config.server.static_dir {
            // The UI owns `/` and every path the API does not claim
            Some(dir) => rest_app.fallback_service(ServeDir::new(dir)),
            None => rest_app
                .route("/", get(root_handler))
                .fallback(handle_not_found),
        }
    }

    /// Start the server and run until Ctrl-C or SIGTERM
    pub async fn start(self) -> Result<()> {
        let addr = self.config.server.listen_address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;

        self.serve_on(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves, then stop
    /// every running process
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.build_app();

        tracing::info!("Server listening on {}", listener.local_addr()?);
        self.log_config_summary();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        let stopped = self.services.processes.stop_all().await;
        tracing::info!(stopped, "Server shutdown complete");
        Ok(())
    }

    fn log_config_summary(&self) {
        let server = &self.config.server;
        let prefix = if server.api_prefix.is_empty() {
            "/"
        } else {
            server.api_prefix.as_str()
        };

        tracing::info!("=== Automator Server Configuration ===");
        tracing::info!("Bind Address: {}", server.listen_address());
        tracing::info!("API prefix: {}", prefix);
        tracing::info!("Static UI: {}", server.static_dir.as_deref().unwrap_or("disabled"));
        tracing::info!("CORS: {}", if server.enable_cors { "Enabled" } else { "Disabled" });
        tracing::info!("Request ID: {}", if server.enable_request_id { "Enabled" } else { "Disabled" });
        tracing::info!("Tracing: {}", if server.enable_tracing { "Enabled" } else { "Disabled" });
        tracing::info!(
            "Processes: {} | Tasks: {}",
            self.services.processes.len(),
            self.services.tasks.len()
        );
        tracing::info!("======================================");
    }
}

fn rest_app_config(server: &ServerConfig) -> RestAppConfig {
    RestAppConfig {
        enable_cors: server.enable_cors,
        enable_request_id: server.enable_request_id,
        enable_tracing: server.enable_tracing,
        api_prefix: server.api_prefix.clone(),
        cors: automator_web::CorsConfig {
            allowed_origins: server.cors.allowed_origins.clone(),
            allowed_methods: server.cors.allowed_methods.clone(),
            allowed_headers: server.cors.allowed_headers.clone(),
            ..automator_web::CorsConfig::default()
        },
    }
}

/// Root handler, used when no static UI is configured
async fn root_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "service": "MLOps Automator",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "processes": "/processes",
            "tasks": "/tasks",
            "health": "/health"
        }
    }))
}

/// Graceful shutdown signal
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
