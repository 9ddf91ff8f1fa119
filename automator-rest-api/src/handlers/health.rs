//! Health check endpoint

use axum::{extract::State, Json};
use tracing::debug;

use crate::{
    context::AppContext,
    models::common::{EntityCounts, HealthResponse},
};

/// Service health with registry counts
pub async fn health_check(State(ctx): State<AppContext>) -> Json<HealthResponse> {
    debug!("Health check requested");

    let processes = ctx.processes.list().await;
    let tasks = ctx.tasks.list().await;

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: ctx.clock.now(),
        started_at: ctx.started_at,
        version: env!("CARGO_PKG_VERSION").to_string(),
        processes: EntityCounts {
            total: processes.len(),
            running: processes.iter().filter(|p| p.status.is_running()).count(),
        },
        tasks: EntityCounts {
            total: tasks.len(),
            running: tasks.iter().filter(|t| t.status.is_running()).count(),
        },
    })
}
