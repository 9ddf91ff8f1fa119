//! Status enums and snapshot transfer objects

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Timestamp reported for events that have not happened yet.
///
/// The web UI compares against `1900-01-01T00:00:00Z`,
/// so the sentinel is kept as a real timestamp instead of a `null`.
pub fn never() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1900, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Lifecycle state of a recurring process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    /// Never started
    #[default]
    Init,
    Running,
    Stopped,
}

/// Lifecycle state of a one-shot task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Never started
    #[default]
    Init,
    Running,
    /// The most recent run completed. Not terminal for the task record.
    Finished,
}

/// Status a client may ask a process to move to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProcessStatusIntent {
    Running,
    Stopped,
}

impl ProcessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::Init => "init",
            ProcessStatus::Running => "running",
            ProcessStatus::Stopped => "stopped",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ProcessStatus::Running)
    }
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Init => "init",
            TaskStatus::Running => "running",
            TaskStatus::Finished => "finished",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, TaskStatus::Running)
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ProcessStatusIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessStatusIntent::Running => f.write_str("running"),
            ProcessStatusIntent::Stopped => f.write_str("stopped"),
        }
    }
}

impl FromStr for ProcessStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "init" => Ok(ProcessStatus::Init),
            "running" => Ok(ProcessStatus::Running),
            "stopped" => Ok(ProcessStatus::Stopped),
            other => Err(format!("Invalid process status: {}", other)),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "init" => Ok(TaskStatus::Init),
            "running" => Ok(TaskStatus::Running),
            "finished" => Ok(TaskStatus::Finished),
            other => Err(format!("Invalid task status: {}", other)),
        }
    }
}

impl FromStr for ProcessStatusIntent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "running" | "start" => Ok(ProcessStatusIntent::Running),
            "stopped" | "stop" => Ok(ProcessStatusIntent::Stopped),
            other => Err(format!(
                "Invalid process status '{}' (expected \"running\" or \"stopped\")",
                other
            )),
        }
    }
}

impl TryFrom<String> for ProcessStatusIntent {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProcessStatusIntent> for String {
    fn from(intent: ProcessStatusIntent) -> Self {
        intent.to_string()
    }
}

/// Point-in-time copy of a process, taken under the process lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    pub name: String,
    pub status: ProcessStatus,
    /// Seconds between cycles
    pub cycle_time: u64,
    pub cycles_completed: u64,
    pub last_cycle_dttm: DateTime<Utc>,
}

/// Point-in-time copy of a task, taken under the task lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub name: String,
    /// Identifier of the current or most recent run; nil before the first run
    pub id: Uuid,
    pub status: TaskStatus,
    /// Seconds a run takes
    pub duration: u64,
    pub start_dttm: DateTime<Utc>,
    pub finish_dttm: DateTime<Utc>,
}

impl ProcessSnapshot {
    /// Whether at least one cycle has completed
    pub fn has_cycled(&self) -> bool {
        self.last_cycle_dttm != never()
    }
}

impl TaskSnapshot {
    /// Whether the task has ever been started
    pub fn has_run(&self) -> bool {
        !self.id.is_nil()
    }
}
