use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct Event {
    pub id: i64,
    // 所属租户
    pub tenant_id: i64,
    pub name: String,
    pub starts_at: Option<chrono::DateTime<chrono::Utc>>,
    pub ends_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct Team {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 团队在活动中的作品
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct Project {
    pub id: i64,
    pub event_id: i64,
    pub team_id: i64,
    pub title: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
