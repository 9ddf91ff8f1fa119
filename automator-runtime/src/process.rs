//! Recurring automation processes
//!
//! A process runs an unbounded loop of `sleep(cycle_time)` followed by a
//! progress update, until it is stopped. Stopping is cooperative: the worker
//! looks at the stop flag at cycle boundaries only, so a stop issued during a
//! sleep takes effect when that sleep ends (up to `cycle_time` seconds later).
//! The cycle cut short by a stop is not counted.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use automator_core::{
    never, AutomatorError, AutomatorResult, Clock, MonotonicClock, ProcessSnapshot,
    ProcessStatus, ProcessStatusIntent,
};

/// A named recurring process and its background cycle worker
pub struct AutomationProcess {
    name: String,
    state: Arc<Mutex<ProcessState>>,
    clock: Arc<dyn Clock>,
}

/// Mutable process fields, guarded by the per-process lock
struct ProcessState {
    status: ProcessStatus,
    cycle_time: u64,
    cycles_completed: u64,
    last_cycle_dttm: DateTime<Utc>,
    /// Cooperative stop signal, read by the worker at cycle boundaries
    stop_requested: bool,
    /// Cleared by the worker itself, under the lock, as it leaves its loop
    worker_running: bool,
    worker: Option<JoinHandle<()>>,
}

impl ProcessState {
    fn snapshot(&self, name: &str) -> ProcessSnapshot {
        ProcessSnapshot {
            name: name.to_string(),
            status: self.status,
            cycle_time: self.cycle_time,
            cycles_completed: self.cycles_completed,
            last_cycle_dttm: self.last_cycle_dttm,
        }
    }

    /// A worker counts as live until it has left its loop. A panicked worker
    /// never clears `worker_running`, so the join handle is checked too.
    fn worker_alive(&self) -> bool {
        self.worker_running
            && self
                .worker
                .as_ref()
                .is_some_and(|handle| !handle.is_finished())
    }
}

impl AutomationProcess {
    /// Create a process using a monotonic clock for its timestamps
    pub fn new(name: impl Into<String>, cycle_time: u64) -> AutomatorResult<Self> {
        Self::with_clock(name, cycle_time, Arc::new(MonotonicClock::new()))
    }

    /// Create a process with an explicit time source
    pub fn with_clock(
        name: impl Into<String>,
        cycle_time: u64,
        clock: Arc<dyn Clock>,
    ) -> AutomatorResult<Self> {
        let cycle_time = AutomatorError::require_positive_seconds("cycle_time", cycle_time)?;

        Ok(Self {
            name: name.into(),
            state: Arc::new(Mutex::new(ProcessState {
                status: ProcessStatus::Init,
                cycle_time,
                cycles_completed: 0,
                last_cycle_dttm: never(),
                stop_requested: false,
                worker_running: false,
                worker: None,
            })),
            clock,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start cycling.
    ///
    /// No-op while running. If a previous worker is still winding down from
    /// a stop, its stop signal is withdrawn and it carries on; otherwise a
    /// fresh worker is spawned. Must be called within a tokio runtime.
    pub async fn start(&self) -> ProcessSnapshot {
        let mut state = self.state.lock().await;

        if state.status.is_running() {
            debug!(process = %self.name, "start ignored, process already running");
            return state.snapshot(&self.name);
        }

        state.stop_requested = false;

        if state.worker_alive() {
            info!(process = %self.name, "Resuming process, previous worker still active");
        } else {
            state.worker_running = true;
            state.worker = Some(tokio::spawn(run_cycles(
                self.name.clone(),
                Arc::clone(&self.state),
                Arc::clone(&self.clock),
            )));
            info!(process = %self.name, cycle_time = state.cycle_time, "Started process worker");
        }

        state.status = ProcessStatus::Running;
        state.snapshot(&self.name)
    }

    /// Stop cycling at the next cycle boundary.
    ///
    /// Always leaves the process `stopped`, whatever its previous state.
    pub async fn stop(&self) -> ProcessSnapshot {
        let mut state = self.state.lock().await;

        if state.status.is_running() {
            state.stop_requested = true;
            info!(process = %self.name, "Stop requested, worker exits at next cycle boundary");
        }

        state.status = ProcessStatus::Stopped;
        state.snapshot(&self.name)
    }

    /// Change the cycle time. The worker picks it up at its next sleep; a
    /// sleep already in progress keeps its original length.
    pub async fn update(&self, cycle_time: Option<u64>) -> AutomatorResult<ProcessSnapshot> {
        let cycle_time = cycle_time
            .map(|seconds| AutomatorError::require_positive_seconds("cycle_time", seconds))
            .transpose()?;

        let mut state = self.state.lock().await;
        if let Some(cycle_time) = cycle_time {
            debug!(process = %self.name, from = state.cycle_time, to = cycle_time, "Updating cycle time");
            state.cycle_time = cycle_time;
        }
        Ok(state.snapshot(&self.name))
    }

    /// Apply a client update: cycle time first, then the requested status.
    ///
    /// Parameters are validated before anything changes.
    pub async fn apply(
        &self,
        cycle_time: Option<u64>,
        intent: Option<ProcessStatusIntent>,
    ) -> AutomatorResult<ProcessSnapshot> {
        let snapshot = self.update(cycle_time).await?;

        Ok(match intent {
            Some(ProcessStatusIntent::Running) => self.start().await,
            Some(ProcessStatusIntent::Stopped) => self.stop().await,
            None => snapshot,
        })
    }

    /// Consistent copy of the current state
    pub async fn snapshot(&self) -> ProcessSnapshot {
        self.state.lock().await.snapshot(&self.name)
    }

    /// Whether a cycle worker is currently alive
    pub async fn is_worker_alive(&self) -> bool {
        self.state.lock().await.worker_alive()
    }
}

impl std::fmt::Debug for AutomationProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutomationProcess")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Cycle worker body
async fn run_cycles(name: String, state: Arc<Mutex<ProcessState>>, clock: Arc<dyn Clock>) {
    debug!(process = %name, "Cycle worker started");

    loop {
        // Read the cycle time once per sleep
        let cycle_time = {
            let mut guard = state.lock().await;
            if guard.stop_requested {
                guard.worker_running = false;
                break;
            }
            guard.cycle_time
        };

        tokio::time::sleep(Duration::from_secs(cycle_time)).await;

        let mut guard = state.lock().await;
        if guard.stop_requested {
            guard.worker_running = false;
            break;
        }
        guard.cycles_completed += 1;
        guard.last_cycle_dttm = clock.now();
        debug!(
            process = %name,
            cycles_completed = guard.cycles_completed,
            "Cycle completed"
        );
    }

    info!(process = %name, "Cycle worker exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use automator_core::MonotonicClock;
    use chrono::TimeZone;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn process(cycle_time: u64) -> AutomationProcess {
        let clock = Arc::new(MonotonicClock::anchored_at(anchor()));
        AutomationProcess::with_clock("process1", cycle_time, clock).unwrap()
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_state() {
        let process = process(5);
        let snapshot = process.snapshot().await;

        assert_eq!(snapshot.name, "process1");
        assert_eq!(snapshot.status, ProcessStatus::Init);
        assert_eq!(snapshot.cycle_time, 5);
        assert_eq!(snapshot.cycles_completed, 0);
        assert_eq!(snapshot.last_cycle_dttm, never());
        assert!(!process.is_worker_alive().await);
    }

    #[test]
    fn test_zero_cycle_time_rejected() {
        let result = AutomationProcess::new("process1", 0);
        assert!(matches!(result, Err(AutomatorError::InvalidParameter { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycles_accumulate() {
        let process = process(1);
        let snapshot = process.start().await;
        assert_eq!(snapshot.status, ProcessStatus::Running);

        sleep_ms(3500).await;

        let snapshot = process.snapshot().await;
        assert_eq!(snapshot.cycles_completed, 3);
        assert_eq!(snapshot.last_cycle_dttm, anchor() + chrono::Duration::seconds(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_spawns_one_worker() {
        let process = process(1);
        process.start().await;
        process.start().await;

        sleep_ms(3500).await;

        assert_eq!(process.snapshot().await.cycles_completed, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_before_first_boundary_counts_nothing() {
        let process = process(5);
        process.start().await;
        let snapshot = process.stop().await;
        assert_eq!(snapshot.status, ProcessStatus::Stopped);

        // The worker is still sleeping until the boundary
        assert!(process.is_worker_alive().await);

        sleep_ms(6000).await;

        let snapshot = process.snapshot().await;
        assert_eq!(snapshot.cycles_completed, 0);
        assert_eq!(snapshot.last_cycle_dttm, never());
        assert!(!process.is_worker_alive().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_after_first_boundary_keeps_completed_cycle() {
        let process = process(5);
        process.start().await;
        sleep_ms(5500).await;
        process.stop().await;

        sleep_ms(6000).await;

        assert_eq!(process.snapshot().await.cycles_completed, 1);
        assert!(!process.is_worker_alive().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let process = process(2);

        // Stopping a never-started process is allowed
        let snapshot = process.stop().await;
        assert_eq!(snapshot.status, ProcessStatus::Stopped);

        process.start().await;
        sleep_ms(2500).await;
        process.stop().await;
        let first = process.stop().await;
        assert_eq!(first.cycles_completed, 1);

        sleep_ms(10_000).await;
        let second = process.stop().await;
        assert_eq!(second.cycles_completed, 1);
        assert_eq!(second.status, ProcessStatus::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_while_winding_down_reuses_worker() {
        let process = process(5);
        process.start().await;
        sleep_ms(1000).await;
        process.stop().await;
        let snapshot = process.start().await;
        assert_eq!(snapshot.status, ProcessStatus::Running);
        assert!(process.is_worker_alive().await);

        // The first worker completes its cycle at t=5s and keeps going
        sleep_ms(4500).await;
        assert_eq!(process.snapshot().await.cycles_completed, 1);

        sleep_ms(5000).await;
        assert_eq!(process.snapshot().await.cycles_completed, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_worker_exit_spawns_fresh_worker() {
        let process = process(5);
        process.start().await;
        process.stop().await;
        sleep_ms(6000).await;
        assert!(!process.is_worker_alive().await);

        process.start().await;
        assert!(process.is_worker_alive().await);

        sleep_ms(5500).await;
        let snapshot = process.snapshot().await;
        assert_eq!(snapshot.cycles_completed, 1);
        assert_eq!(snapshot.status, ProcessStatus::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_time_update_applies_at_next_sleep() {
        let process = process(10);
        process.start().await;
        sleep_ms(1000).await;

        let snapshot = process.update(Some(2)).await.unwrap();
        assert_eq!(snapshot.cycle_time, 2);

        // In-flight 10s sleep is not shortened
        sleep_ms(8500).await;
        assert_eq!(process.snapshot().await.cycles_completed, 0);

        // First boundary at t=10s, second at t=12s
        sleep_ms(1000).await;
        assert_eq!(process.snapshot().await.cycles_completed, 1);
        sleep_ms(2000).await;
        assert_eq!(process.snapshot().await.cycles_completed, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_rejects_zero_cycle_time() {
        let process = process(3);
        let result = process.update(Some(0)).await;
        assert!(matches!(result, Err(AutomatorError::InvalidParameter { .. })));
        assert_eq!(process.snapshot().await.cycle_time, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_combines_update_and_intent() {
        let process = process(5);

        let snapshot = process
            .apply(Some(1), Some(ProcessStatusIntent::Running))
            .await
            .unwrap();
        assert_eq!(snapshot.cycle_time, 1);
        assert_eq!(snapshot.status, ProcessStatus::Running);

        sleep_ms(2500).await;

        let snapshot = process
            .apply(None, Some(ProcessStatusIntent::Stopped))
            .await
            .unwrap();
        assert_eq!(snapshot.status, ProcessStatus::Stopped);
        assert_eq!(snapshot.cycles_completed, 2);

        // Invalid cycle time leaves the status alone
        let result = process.apply(Some(0), Some(ProcessStatusIntent::Running)).await;
        assert!(result.is_err());
        assert_eq!(process.snapshot().await.status, ProcessStatus::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshots_never_regress_while_cycling() {
        let process = Arc::new(process(1));
        process.start().await;

        let reader = {
            let process = Arc::clone(&process);
            tokio::spawn(async move {
                let mut seen = Vec::new();
                for _ in 0..50 {
                    seen.push(process.snapshot().await);
                    tokio::time::sleep(Duration::from_millis(130)).await;
                }
                seen
            })
        };

        let seen = reader.await.unwrap();
        for pair in seen.windows(2) {
            assert!(pair[1].cycles_completed >= pair[0].cycles_completed);
            assert!(pair[1].last_cycle_dttm >= pair[0].last_cycle_dttm);
        }
        assert!(seen.last().unwrap().cycles_completed >= 6);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_readers_see_consistent_snapshots() {
        let process = Arc::new(AutomationProcess::new("process1", 1).unwrap());
        process.start().await;

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let process = Arc::clone(&process);
                tokio::spawn(async move {
                    let mut seen = Vec::new();
                    for _ in 0..250 {
                        seen.push(process.snapshot().await);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                    seen
                })
            })
            .collect();

        for reader in readers {
            let seen = reader.await.unwrap();
            for pair in seen.windows(2) {
                assert!(pair[1].cycles_completed >= pair[0].cycles_completed);
                assert!(pair[1].last_cycle_dttm >= pair[0].last_cycle_dttm);
            }
            for snapshot in &seen {
                assert_eq!(snapshot.status, ProcessStatus::Running);
                // A counted cycle always comes with its timestamp
                assert_eq!(snapshot.cycles_completed > 0, snapshot.has_cycled());
            }
        }

        let snapshot = process.stop().await;
        assert!(snapshot.cycles_completed >= 1);
    }
}
