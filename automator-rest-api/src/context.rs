//! Shared state injected into every handler

use automator_core::Clock;
use automator_runtime::{ProcessRegistry, TaskRegistry};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Registries built at startup, shared by all requests
#[derive(Debug, Clone)]
pub struct AppContext {
    pub processes: Arc<ProcessRegistry>,
    pub tasks: Arc<TaskRegistry>,
    /// Same time source the entities stamp their events with
    pub clock: Arc<dyn Clock>,
    /// Reported by the health endpoint
    pub started_at: DateTime<Utc>,
}

impl AppContext {
    pub fn new(
        processes: Arc<ProcessRegistry>,
        tasks: Arc<TaskRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            processes,
            tasks,
            started_at: clock.now(),
            clock,
        }
    }
}
