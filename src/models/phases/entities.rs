use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 任务交付形式
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/phase.ts")]
pub enum DeliveryKind {
    Text,
    File,
    Url,
    Video,
    Audio,
    Zip,
    None,
}

impl DeliveryKind {
    pub const TEXT: &'static str = "text";
    pub const FILE: &'static str = "file";
    pub const URL: &'static str = "url";
    pub const VIDEO: &'static str = "video";
    pub const AUDIO: &'static str = "audio";
    pub const ZIP: &'static str = "zip";
    pub const NONE: &'static str = "none";
}

impl<'de> Deserialize<'de> for DeliveryKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for DeliveryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DeliveryKind::Text => DeliveryKind::TEXT,
            DeliveryKind::File => DeliveryKind::FILE,
            DeliveryKind::Url => DeliveryKind::URL,
            DeliveryKind::Video => DeliveryKind::VIDEO,
            DeliveryKind::Audio => DeliveryKind::AUDIO,
            DeliveryKind::Zip => DeliveryKind::ZIP,
            DeliveryKind::None => DeliveryKind::NONE,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for DeliveryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            DeliveryKind::TEXT => Ok(DeliveryKind::Text),
            DeliveryKind::FILE => Ok(DeliveryKind::File),
            DeliveryKind::URL => Ok(DeliveryKind::Url),
            DeliveryKind::VIDEO => Ok(DeliveryKind::Video),
            DeliveryKind::AUDIO => Ok(DeliveryKind::Audio),
            DeliveryKind::ZIP => Ok(DeliveryKind::Zip),
            DeliveryKind::NONE => Ok(DeliveryKind::None),
            _ => Err(format!(
                "无效的交付形式: '{s}'. 支持: text, file, url, video, audio, zip, none"
            )),
        }
    }
}

/// 活动中的一个阶段
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/phase.ts")]
pub struct Phase {
    pub id: i64,
    pub event_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub order_index: i32,
    // 可见时间窗
    pub view_start: Option<chrono::DateTime<chrono::Utc>>,
    pub view_end: Option<chrono::DateTime<chrono::Utc>>,
    // 是否为淘汰阶段
    pub is_elimination: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 阶段中的一个任务
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/phase.ts")]
pub struct Task {
    pub id: i64,
    pub phase_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub delivery_kind: DeliveryKind,
    pub required: bool,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
    pub order_index: i32,
    // 显式绑定的评分规则，优先级最高
    pub rubric_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
