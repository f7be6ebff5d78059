use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tracking.ts")]
pub struct TrackingParams {
    /// 只统计 final 状态的提交
    #[serde(default)]
    pub final_only: bool,
}
