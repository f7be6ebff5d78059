pub mod actors;
pub mod common;
pub mod evaluations;
pub mod events;
pub mod phases;
pub mod rubrics;
pub mod submissions;
pub mod system;
pub mod tracking;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

/// 应用启动时间，用于健康检查计算运行时长
#[derive(Debug, Clone, Copy)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

// 业务错误码
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[repr(i32)]
#[ts(export, export_to = "../frontend/src/types/generated/error_code.ts")]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,
    ServiceUnavailable = 1503,

    // 活动与阶段
    EventNotFound = 2000,
    PhaseNotFound = 2001,
    TaskNotFound = 2002,
    TeamNotFound = 2003,
    ProjectNotFound = 2004,
    PhaseCreationFailed = 2010,
    TaskCreationFailed = 2011,

    // 提交
    SubmissionNotFound = 3000,
    SubmissionCreationFailed = 3001,
    SubmissionNotEditable = 3002,

    // 评分规则
    RubricNotFound = 4000,
    RubricInvalid = 4001,
    CriterionNotFound = 4002,

    // 评审
    EvaluationNotFound = 5000,
    EvaluationScopeInvalid = 5001,
    EvaluationScoreOutOfRange = 5002,
    EvaluationNotDraft = 5003,
    EvaluationFinalExists = 5004,
    NoRubricConfigured = 5005,
    AiAssistUnavailable = 5006,
}

impl ErrorCode {
    /// 将错误种类映射为对外的业务错误码
    pub fn from_error(err: &crate::errors::HackHubError) -> Self {
        use crate::errors::HackHubError;

        match err {
            HackHubError::Validation(_) => ErrorCode::BadRequest,
            HackHubError::NotFound(_) => ErrorCode::NotFound,
            HackHubError::Conflict(_) => ErrorCode::Conflict,
            HackHubError::NoRubricConfigured(_) => ErrorCode::NoRubricConfigured,
            HackHubError::AdapterUnavailable(_) => ErrorCode::AiAssistUnavailable,
            HackHubError::Authentication(_) => ErrorCode::Unauthorized,
            HackHubError::Authorization(_) => ErrorCode::Forbidden,
            _ => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HackHubError;

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            ErrorCode::from_error(&HackHubError::no_rubric_configured("x")),
            ErrorCode::NoRubricConfigured
        );
        assert_eq!(
            ErrorCode::from_error(&HackHubError::adapter_unavailable("x")),
            ErrorCode::AiAssistUnavailable
        );
        assert_eq!(
            ErrorCode::from_error(&HackHubError::database_operation("x")),
            ErrorCode::InternalServerError
        );
        assert_eq!(ErrorCode::Conflict as i32, 1009);
    }
}
