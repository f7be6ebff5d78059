use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SystemInfoResponse {
    pub system_name: String,     // 系统名称
    pub environment: String,     // 运行环境
    pub started_at: String,      // 启动时间
    pub uptime_seconds: i64,     // 运行时长
    pub ai_assist_provider: String,
    pub final_uniqueness: String, // target | reviewer
}
