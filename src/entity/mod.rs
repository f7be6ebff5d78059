//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 时间统一以秒级时间戳存储，JSON 字段以文本存储。

pub mod prelude;

pub mod evaluations;
pub mod events;
pub mod phase_rubric_criteria;
pub mod phase_rubrics;
pub mod phases;
pub mod projects;
pub mod submissions;
pub mod tasks;
pub mod teams;

use chrono::{DateTime, Utc};

pub(crate) fn ts_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

pub(crate) fn opt_ts_to_datetime(ts: Option<i64>) -> Option<DateTime<Utc>> {
    ts.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
}
