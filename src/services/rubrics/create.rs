use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::RubricService;
use super::criteria::validate_create_rubric;
use crate::errors::{HackHubError, Result};
use crate::models::actors::entities::Actor;
use crate::models::common::response::error_response;
use crate::models::rubrics::entities::PhaseRubric;
use crate::models::rubrics::requests::CreateRubricRequest;
use crate::models::ApiResponse;
use crate::services::access::{current_actor, load_event_for};
use crate::storage::Storage;

pub async fn create_rubric(
    service: &RubricService,
    request: &HttpRequest,
    event_id: i64,
    req: CreateRubricRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let result = match current_actor(request) {
        Ok(actor) => create(storage.as_ref(), &actor, event_id, req).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(rubric) => Ok(HttpResponse::Created().json(ApiResponse::success(rubric, "评分规则创建成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn create(
    storage: &dyn Storage,
    actor: &Actor,
    event_id: i64,
    req: CreateRubricRequest,
) -> Result<PhaseRubric> {
    let event = load_event_for(storage, actor, event_id).await?;
    validate_create_rubric(&req)?;

    storage
        .get_phase_by_id(req.phase_id)
        .await?
        .filter(|p| p.event_id == event.id)
        .ok_or_else(|| HackHubError::not_found(format!("阶段 {} 不存在", req.phase_id)))?;

    if let Some(task_id) = req.task_id {
        storage
            .get_task_by_id(task_id)
            .await?
            .filter(|t| t.phase_id == req.phase_id)
            .ok_or_else(|| HackHubError::not_found(format!("任务 {task_id} 不在该阶段中")))?;
    }

    let rubric = storage.create_rubric(Some(actor.id), req).await?;
    info!(
        "Rubric {} created for phase {} (task {:?}) by actor {}",
        rubric.id, rubric.phase_id, rubric.task_id, actor.id
    );
    Ok(rubric)
}
