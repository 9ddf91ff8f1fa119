//! Core error types

use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Kind of entity held in a registry, used in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Process,
    Task,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Process => f.write_str("Process"),
            EntityKind::Task => f.write_str("Task"),
        }
    }
}

/// Errors produced by the runtime and its registries
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AutomatorError {
    /// A task start was requested while a run is in progress.
    /// Nothing was changed.
    #[error("Task '{name}' is already running (run id {run_id})")]
    AlreadyRunning { name: String, run_id: Uuid },

    /// No entity with this name in the registry
    #[error("{kind} '{name}' not found")]
    NotFound { kind: EntityKind, name: String },

    /// Two entities of the same kind share a name
    #[error("Duplicate {kind} name '{name}'")]
    DuplicateName { kind: EntityKind, name: String },

    /// A parameter is out of range
    #[error("Invalid {field}: {message}")]
    InvalidParameter { field: String, message: String },
}

/// Result type alias for runtime operations
pub type AutomatorResult<T> = std::result::Result<T, AutomatorError>;

impl AutomatorError {
    pub fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        AutomatorError::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn invalid_parameter(field: impl Into<String>, message: impl Into<String>) -> Self {
        AutomatorError::InvalidParameter {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Reject zero-second cycle times and durations
    pub fn require_positive_seconds(field: &str, seconds: u64) -> AutomatorResult<u64> {
        if seconds == 0 {
            return Err(Self::invalid_parameter(
                field,
                "must be a positive number of seconds",
            ));
        }
        Ok(seconds)
    }
}
