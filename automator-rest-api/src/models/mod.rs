pub mod common;
pub mod processes;
pub mod tasks;

pub use common::{parse_optional_body, HealthResponse};
pub use processes::{ProcessListResponse, UpdateProcessRequest};
pub use tasks::{TaskListResponse, TaskParamsRequest};
