//! Task run endpoints

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use automator_core::TaskSnapshot;
use tracing::info;

use crate::{
    context::AppContext,
    errors::RestResult,
    models::{parse_optional_body, TaskListResponse, TaskParamsRequest},
};

/// List all tasks in registration order
pub async fn list_tasks(State(ctx): State<AppContext>) -> Json<TaskListResponse> {
    Json(TaskListResponse {
        tasks: ctx.tasks.list().await,
    })
}

pub async fn get_task(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
) -> RestResult<Json<TaskSnapshot>> {
    Ok(Json(ctx.tasks.snapshot_of(&name).await?))
}

/// Start a new run of a task
///
/// An optional `duration` in the body replaces the task's duration, but only
/// if the run actually starts. Responds 409 while a run is in progress.
pub async fn start_task(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
    body: Bytes,
) -> RestResult<Json<TaskSnapshot>> {
    let params: TaskParamsRequest = parse_optional_body(&body)?;
    info!(task = %name, duration = ?params.duration, "Starting task");

    let task = ctx.tasks.get(&name)?;
    Ok(Json(task.start_with(params.duration).await?))
}

pub async fn update_task(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
    body: Bytes,
) -> RestResult<Json<TaskSnapshot>> {
    let params: TaskParamsRequest = parse_optional_body(&body)?;
    info!(task = %name, duration = ?params.duration, "Updating task");

    let task = ctx.tasks.get(&name)?;
    Ok(Json(task.update(params.duration).await?))
}
