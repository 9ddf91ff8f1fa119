//! # Automator REST API
//!
//! HTTP facade over the process and task registries. Handlers look entities
//! up by name, call into the runtime and return the resulting snapshot.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use automator_core::MonotonicClock;
//! use automator_rest_api::{create_rest_app, AppConfig, AppContext};
//! use automator_runtime::{AutomationProcess, AutomationTask, ProcessRegistry, TaskRegistry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let processes = ProcessRegistry::new(vec![AutomationProcess::new("process1", 5)?])?;
//! let tasks = TaskRegistry::new(vec![AutomationTask::new("task1", 60)?])?;
//!
//! let context = AppContext::new(Arc::new(processes), Arc::new(tasks), Arc::new(MonotonicClock::new()));
//! let app = create_rest_app(context, AppConfig::default());
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod context;
pub mod errors;
pub mod handlers;
pub mod models;

pub use app::{create_rest_app, AppConfig};
pub use context::AppContext;
pub use errors::{RestError, RestResult};
pub use models::*;
