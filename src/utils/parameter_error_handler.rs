//! 请求参数解析失败时的统一响应

use actix_web::error::{InternalError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{Error, HttpRequest, HttpResponse};

use crate::models::{ApiResponse, ErrorCode};

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    tracing::debug!("JSON 参数解析失败 {}: {}", req.path(), err);
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("请求体格式错误: {err}"),
    ));
    InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    tracing::debug!("查询参数解析失败 {}: {}", req.path(), err);
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("查询参数错误: {err}"),
    ));
    InternalError::from_response(err, response).into()
}

// 路径中的 ID 不是整数时返回 400 而不是 404
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> Error {
    tracing::debug!("路径参数解析失败 {}: {}", req.path(), err);
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("路径参数错误: {err}"),
    ));
    InternalError::from_response(err, response).into()
}
