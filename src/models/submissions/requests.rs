use serde::Deserialize;
use ts_rs::TS;

use crate::models::submissions::entities::{SubmissionStatus, SubmissionType};

/// 创建提交请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct CreateSubmissionRequest {
    pub task_id: i64,
    // 组织者代交时必须指定；参赛者默认使用自己的团队
    pub team_id: Option<i64>,
    pub content: Option<String>,
    pub submission_type: Option<SubmissionType>,
}

/// 提交列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListParams {
    pub team_id: Option<i64>,
    pub task_id: Option<i64>,
    pub status: Option<SubmissionStatus>,
}
