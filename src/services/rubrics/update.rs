use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::criteria::{validate_criteria_fit, validate_scale};
use super::{RubricService, load_rubric_in_event};
use crate::errors::{HackHubError, Result};
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::rubrics::entities::PhaseRubric;
use crate::models::rubrics::requests::UpdateRubricRequest;
use crate::services::access::{current_actor, load_event_for};
use crate::storage::Storage;
use crate::utils::validate::validate_title;

pub async fn update_rubric(
    service: &RubricService,
    request: &HttpRequest,
    event_id: i64,
    rubric_id: i64,
    req: UpdateRubricRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let actor = match current_actor(request) {
        Ok(actor) => actor,
        Err(e) => return Ok(error_response(&e)),
    };
    if let Err(e) = load_event_for(storage.as_ref(), &actor, event_id).await {
        return Ok(error_response(&e));
    }

    match update(storage.as_ref(), event_id, rubric_id, req).await {
        Ok(rubric) => {
            info!("Rubric {} updated by actor {}", rubric.id, actor.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(rubric, "评分规则更新成功")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

async fn update(
    storage: &dyn Storage,
    event_id: i64,
    rubric_id: i64,
    req: UpdateRubricRequest,
) -> Result<PhaseRubric> {
    let existing = load_rubric_in_event(storage, event_id, rubric_id).await?;

    if let Some(name) = &req.name {
        validate_title(name).map_err(HackHubError::validation)?;
    }
    // 只改一端时与另一端的现值一起校验
    let scale_max = req.scale_max.unwrap_or(existing.scale_max);
    validate_scale(req.scale_min.unwrap_or(existing.scale_min), scale_max)?;
    validate_criteria_fit(&existing.criteria, scale_max)?;

    storage
        .update_rubric(rubric_id, req)
        .await?
        .ok_or_else(|| HackHubError::not_found(format!("评分规则 {rubric_id} 不存在")))
}
