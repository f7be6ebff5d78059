use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubmissionService, load_task_in_event};
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::submissions::requests::SubmissionListParams;
use crate::models::submissions::responses::SubmissionListResponse;
use crate::services::access::{current_actor, ensure_team_access, load_event_for};

pub async fn list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    event_id: i64,
    mut params: SubmissionListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let result: Result<SubmissionListResponse> = async {
        let actor = current_actor(request)?;
        let event = load_event_for(storage.as_ref(), &actor, event_id).await?;

        // 参赛者只能查看自己团队的提交
        if !actor.is_reviewer() {
            params.team_id = params.team_id.or(actor.team_id);
        }
        if let Some(team_id) = params.team_id {
            ensure_team_access(&actor, team_id)?;
        } else if !actor.is_reviewer() {
            return Ok(SubmissionListResponse { items: Vec::new() });
        }
        if let Some(task_id) = params.task_id {
            load_task_in_event(storage.as_ref(), event.id, task_id).await?;
        }

        let items = storage.list_event_submissions(event.id, params).await?;
        Ok(SubmissionListResponse { items })
    }
    .await;

    match result {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list, "查询成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}
