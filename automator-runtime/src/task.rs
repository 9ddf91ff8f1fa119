//! One-shot automation tasks
//!
//! Each start begins a fresh run with a new run identifier. The run sleeps
//! for the task's duration and then marks itself finished. There is no way to
//! cancel a run; a start issued while one is in progress is rejected.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use automator_core::{
    never, AutomatorError, AutomatorResult, Clock, MonotonicClock, TaskSnapshot, TaskStatus,
};

/// A named one-shot task and its current or most recent run
pub struct AutomationTask {
    name: String,
    state: Arc<Mutex<TaskState>>,
    clock: Arc<dyn Clock>,
}

struct TaskState {
    id: Uuid,
    status: TaskStatus,
    duration: u64,
    start_dttm: DateTime<Utc>,
    finish_dttm: DateTime<Utc>,
    worker: Option<JoinHandle<()>>,
}

impl TaskState {
    fn snapshot(&self, name: &str) -> TaskSnapshot {
        TaskSnapshot {
            name: name.to_string(),
            id: self.id,
            status: self.status,
            duration: self.duration,
            start_dttm: self.start_dttm,
            finish_dttm: self.finish_dttm,
        }
    }
}

impl AutomationTask {
    /// Create a task using a monotonic clock for its timestamps
    pub fn new(name: impl Into<String>, duration: u64) -> AutomatorResult<Self> {
        Self::with_clock(name, duration, Arc::new(MonotonicClock::new()))
    }

    /// Create a task with an explicit time source
    pub fn with_clock(
        name: impl Into<String>,
        duration: u64,
        clock: Arc<dyn Clock>,
    ) -> AutomatorResult<Self> {
        let duration = AutomatorError::require_positive_seconds("duration", duration)?;

        Ok(Self {
            name: name.into(),
            state: Arc::new(Mutex::new(TaskState {
                id: Uuid::nil(),
                status: TaskStatus::Init,
                duration,
                start_dttm: never(),
                finish_dttm: never(),
                worker: None,
            })),
            clock,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start a new run with the configured duration
    pub async fn start(&self) -> AutomatorResult<TaskSnapshot> {
        self.start_with(None).await
    }

    /// Start a new run, optionally replacing the duration first.
    ///
    /// Fails with [`AutomatorError::AlreadyRunning`] while a run is in
    /// progress; in that case nothing changes, the override included.
    pub async fn start_with(&self, duration: Option<u64>) -> AutomatorResult<TaskSnapshot> {
        let duration = duration
            .map(|seconds| AutomatorError::require_positive_seconds("duration", seconds))
            .transpose()?;

        let mut state = self.state.lock().await;

        if state.status.is_running() {
            warn!(task = %self.name, run_id = %state.id, "Start rejected, task already running");
            return Err(AutomatorError::AlreadyRunning {
                name: self.name.clone(),
                run_id: state.id,
            });
        }

        if let Some(duration) = duration {
            state.duration = duration;
        }

        let run_id = Uuid::new_v4();
        state.id = run_id;
        state.worker = Some(tokio::spawn(run_once(
            self.name.clone(),
            Arc::clone(&self.state),
            Arc::clone(&self.clock),
            run_id,
            Duration::from_secs(state.duration),
        )));
        state.status = TaskStatus::Running;
        state.start_dttm = self.clock.now();
        state.finish_dttm = never();

        info!(task = %self.name, run_id = %run_id, duration = state.duration, "Started task run");
        Ok(state.snapshot(&self.name))
    }

    /// Change the duration used by later runs. A run in progress keeps the
    /// duration it started with.
    pub async fn update(&self, duration: Option<u64>) -> AutomatorResult<TaskSnapshot> {
        let duration = duration
            .map(|seconds| AutomatorError::require_positive_seconds("duration", seconds))
            .transpose()?;

        let mut state = self.state.lock().await;
        if let Some(duration) = duration {
            debug!(task = %self.name, from = state.duration, to = duration, "Updating task duration");
            state.duration = duration;
        }
        Ok(state.snapshot(&self.name))
    }

    /// Consistent copy of the current state
    pub async fn snapshot(&self) -> TaskSnapshot {
        self.state.lock().await.snapshot(&self.name)
    }

    /// Whether a run worker is currently alive
    pub async fn is_worker_alive(&self) -> bool {
        self.state
            .lock()
            .await
            .worker
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl std::fmt::Debug for AutomationTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutomationTask")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Run worker body
async fn run_once(
    name: String,
    state: Arc<Mutex<TaskState>>,
    clock: Arc<dyn Clock>,
    run_id: Uuid,
    duration: Duration,
) {
    tokio::time::sleep(duration).await;

    let mut guard = state.lock().await;
    // Only the worker of the current run may finish it
    if guard.id != run_id {
        warn!(task = %name, run_id = %run_id, "Run superseded before completion");
        return;
    }
    guard.finish_dttm = clock.now();
    guard.status = TaskStatus::Finished;

    info!(task = %name, run_id = %run_id, "Task run finished");
}
