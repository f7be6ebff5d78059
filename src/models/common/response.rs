use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::HackHubError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn from_error(err: &HackHubError) -> Self {
        Self::error_empty(ErrorCode::from_error(err), err.message())
    }
}

/// 将领域错误转换为 HTTP 响应，状态码与错误种类一一对应
pub fn error_response(err: &HackHubError) -> HttpResponse {
    if err.status_code().is_server_error() {
        tracing::error!("{}", err.format_simple());
    } else {
        tracing::debug!("{}", err.format_simple());
    }
    HttpResponse::build(err.status_code()).json(ApiResponse::from_error(err))
}
