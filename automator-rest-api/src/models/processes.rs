use automator_core::{ProcessSnapshot, ProcessStatusIntent};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessListResponse {
    pub processes: Vec<ProcessSnapshot>,
}

/// Body of `PATCH /processes/{name}`: cycle time is applied before status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProcessRequest {
    #[serde(default)]
    pub cycle_time: Option<u64>,
    #[serde(default)]
    pub status: Option<ProcessStatusIntent>,
}
