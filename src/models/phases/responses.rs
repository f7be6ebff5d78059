use serde::Serialize;
use ts_rs::TS;

use crate::models::phases::entities::{Phase, Task};

/// 阶段及其任务（已按展示顺序排列）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/phase.ts")]
pub struct PhaseWithTasks {
    #[serde(flatten)]
    #[ts(flatten)]
    pub phase: Phase,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/phase.ts")]
pub struct PhaseListResponse {
    pub items: Vec<PhaseWithTasks>,
}
