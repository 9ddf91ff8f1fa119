//! Core types for the automation service
//!
//! This crate holds the domain vocabulary shared by the runtime, the REST API
//! and the server: status enums, snapshot transfer objects, timestamp
//! sentinels, the clock abstraction and the error taxonomy.

pub mod clock;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use clock::{Clock, MonotonicClock};
pub use error::{AutomatorError, AutomatorResult, EntityKind};
pub use types::{
    never, ProcessSnapshot, ProcessStatus, ProcessStatusIntent, TaskSnapshot, TaskStatus,
};
