use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use crate::models::phases::entities::DeliveryKind;

/// 创建阶段请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/phase.ts")]
pub struct CreatePhaseRequest {
    pub title: String,
    pub description: Option<String>,
    pub order_index: Option<i32>,
    pub view_start: Option<DateTime<Utc>>,
    pub view_end: Option<DateTime<Utc>>,
    pub is_elimination: Option<bool>,
}

/// 创建任务请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/phase.ts")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub delivery_kind: DeliveryKind,
    pub required: Option<bool>,
    pub due_at: Option<DateTime<Utc>>, // ISO 8601 格式
    pub order_index: Option<i32>,
    pub rubric_id: Option<i64>,
}

/// 更新任务请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/phase.ts")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub required: Option<bool>,
    pub due_at: Option<DateTime<Utc>>,
    pub order_index: Option<i32>,
    // 传 0 表示解除绑定
    pub rubric_id: Option<i64>,
}
