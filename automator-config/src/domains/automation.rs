//! Registry content created at startup

use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_unique_names, Validatable};

/// Processes and tasks to register when the service starts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    #[serde(default = "default_processes")]
    pub processes: Vec<ProcessDefinition>,

    #[serde(default = "default_tasks")]
    pub tasks: Vec<TaskDefinition>,

    /// Start every process as soon as the registry is built
    #[serde(default = "crate::domains::utils::default_false")]
    pub autostart_processes: bool,
}

/// A recurring process, cycle time in seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDefinition {
    pub name: String,
    pub cycle_time: u64,
}

/// A one-shot task, duration in seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub name: String,
    pub duration: u64,
}

impl ProcessDefinition {
    pub fn new(name: impl Into<String>, cycle_time: u64) -> Self {
        Self {
            name: name.into(),
            cycle_time,
        }
    }
}

impl TaskDefinition {
    pub fn new(name: impl Into<String>, duration: u64) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            processes: default_processes(),
            tasks: default_tasks(),
            autostart_processes: false,
        }
    }
}

impl Validatable for AutomationConfig {
    fn validate(&self) -> ConfigResult<()> {
        let domain = self.domain_name();

        validate_unique_names(
            self.processes.iter().map(|p| p.name.as_str()),
            "process name",
            domain,
        )?;
        for process in &self.processes {
            validate_positive(
                process.cycle_time,
                &format!("cycle_time of process '{}'", process.name),
                domain,
            )?;
        }

        validate_unique_names(
            self.tasks.iter().map(|t| t.name.as_str()),
            "task name",
            domain,
        )?;
        for task in &self.tasks {
            validate_positive(
                task.duration,
                &format!("duration of task '{}'", task.name),
                domain,
            )?;
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "automation"
    }
}

fn default_processes() -> Vec<ProcessDefinition> {
    vec![
        ProcessDefinition::new("process1", 5),
        ProcessDefinition::new("process2", 15),
    ]
}

fn default_tasks() -> Vec<TaskDefinition> {
    vec![
        TaskDefinition::new("task1", 60),
        TaskDefinition::new("task2", 60),
    ]
}
