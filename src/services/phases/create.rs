use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::PhaseService;
use crate::errors::{HackHubError, Result};
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::phases::entities::Phase;
use crate::models::phases::requests::CreatePhaseRequest;
use crate::services::access::{current_actor, load_event_for};
use crate::utils::validate::validate_title;

pub async fn create_phase(
    service: &PhaseService,
    request: &HttpRequest,
    event_id: i64,
    req: CreatePhaseRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let result: Result<Phase> = async {
        let actor = current_actor(request)?;
        let event = load_event_for(storage.as_ref(), &actor, event_id).await?;
        validate_title(&req.title).map_err(HackHubError::validation)?;
        if let (Some(start), Some(end)) = (req.view_start, req.view_end)
            && start > end
        {
            return Err(HackHubError::validation("view_start 不能晚于 view_end"));
        }

        let phase = storage.create_phase(event.id, req).await?;
        info!(
            "Phase {} created in event {} by actor {}",
            phase.id, event.id, actor.id
        );
        service.invalidate_tracking(request, event.id).await;
        Ok(phase)
    }
    .await;

    match result {
        Ok(phase) => Ok(HttpResponse::Created().json(ApiResponse::success(phase, "阶段创建成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}
