//! Runtime components for the automation service
//!
//! This crate owns the background workers behind every automation entity:
//! recurring processes that cycle until stopped, one-shot tasks that run for
//! a fixed duration, and the name-keyed registries the HTTP layer queries.
//!
//! Each entity guards its mutable state with its own lock. Workers only take
//! that lock to read their parameters and to publish progress, never while
//! sleeping, so requests are never blocked behind a running cycle.

pub mod process;
pub mod registry;
pub mod task;

// Re-export commonly used types
pub use process::AutomationProcess;
pub use registry::{ProcessRegistry, Registry, RegistryEntry, TaskRegistry};
pub use task::AutomationTask;
