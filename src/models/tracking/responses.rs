use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 矩阵中的阶段分组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tracking.ts")]
pub struct TrackingPhase {
    pub phase_id: i64,
    pub title: String,
    pub order_index: i32,
    pub is_elimination: bool,
    // 该阶段的任务列，按统一排序规则
    pub task_ids: Vec<i64>,
}

/// 矩阵列（任务）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tracking.ts")]
pub struct TrackingColumn {
    pub task_id: i64,
    pub phase_id: i64,
    pub title: String,
    pub required: bool,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// 团队在某个阶段上的阶段级评审状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tracking.ts")]
pub struct TeamPhaseStatus {
    pub phase_id: i64,
    pub has_final_evaluation: bool,
}

/// 矩阵行（团队）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tracking.ts")]
pub struct TrackingTeam {
    pub team_id: i64,
    pub name: String,
    pub phases: Vec<TeamPhaseStatus>,
    // 活动级：是否存在项目范围的 final 评审
    pub has_project_final_evaluation: bool,
}

/// 单元格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tracking.ts")]
pub struct TrackingCell {
    pub team_id: i64,
    pub task_id: i64,
    pub submitted: bool,
    pub has_final_evaluation: bool,
    pub has_pending_evaluation: bool,
    // 最近一次提交
    pub latest_submission_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tracking.ts")]
pub struct TrackingMatrix {
    pub event_id: i64,
    pub final_only: bool,
    pub phases: Vec<TrackingPhase>,
    pub teams: Vec<TrackingTeam>,
    pub columns: Vec<TrackingColumn>,
    // 按团队顺序、再按列顺序展开
    pub cells: Vec<TrackingCell>,
}
