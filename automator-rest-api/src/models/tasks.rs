use automator_core::TaskSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskSnapshot>,
}

/// Body of `POST` and `PATCH /tasks/{name}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskParamsRequest {
    #[serde(default)]
    pub duration: Option<u64>,
}
