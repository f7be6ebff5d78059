use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{RubricService, get_rubric_for};
use crate::errors::HackHubError;
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::rubrics::requests::ResolveRubricParams;
use crate::services::access::{current_actor, load_event_for};

/// 解析阶段或任务实际生效的评分规则；未配置时返回 409 NoRubricConfigured
pub async fn resolve_rubric(
    service: &RubricService,
    request: &HttpRequest,
    event_id: i64,
    params: ResolveRubricParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let actor = match current_actor(request) {
        Ok(actor) => actor,
        Err(e) => return Ok(error_response(&e)),
    };
    let event = match load_event_for(storage.as_ref(), &actor, event_id).await {
        Ok(event) => event,
        Err(e) => return Ok(error_response(&e)),
    };

    match get_rubric_for(storage.as_ref(), event.id, params.phase_id, params.task_id).await {
        Ok(Some(rubric)) => Ok(HttpResponse::Ok().json(ApiResponse::success(rubric, "查询成功"))),
        Ok(None) => Ok(error_response(&HackHubError::no_rubric_configured(format!(
            "阶段 {} 未配置评分规则",
            params.phase_id
        )))),
        Err(e) => Ok(error_response(&e)),
    }
}
