//! Process supervision endpoints

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use automator_core::ProcessSnapshot;
use tracing::info;

use crate::{
    context::AppContext,
    errors::RestResult,
    models::{parse_optional_body, ProcessListResponse, UpdateProcessRequest},
};

/// List all processes in registration order
pub async fn list_processes(State(ctx): State<AppContext>) -> Json<ProcessListResponse> {
    Json(ProcessListResponse {
        processes: ctx.processes.list().await,
    })
}

pub async fn get_process(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
) -> RestResult<Json<ProcessSnapshot>> {
    Ok(Json(ctx.processes.snapshot_of(&name).await?))
}

/// Update a process
///
/// Accepts an optional `cycle_time` and an optional `status` of `running` or
/// `stopped`. The cycle time is applied first, then the status change.
pub async fn update_process(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
    body: Bytes,
) -> RestResult<Json<ProcessSnapshot>> {
    let request: UpdateProcessRequest = parse_optional_body(&body)?;
    info!(process = %name, ?request, "Updating process");

    let process = ctx.processes.get(&name)?;
    Ok(Json(process.apply(request.cycle_time, request.status).await?))
}

pub async fn start_process(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
) -> RestResult<Json<ProcessSnapshot>> {
    info!(process = %name, "Starting process");
    let process = ctx.processes.get(&name)?;
    Ok(Json(process.start().await))
}

/// Stop a process
///
/// Returns immediately with status `stopped`; the worker itself exits at its
/// next cycle boundary.
pub async fn stop_process(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
) -> RestResult<Json<ProcessSnapshot>> {
    info!(process = %name, "Stopping process");
    let process = ctx.processes.get(&name)?;
    Ok(Json(process.stop().await))
}
