use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SubmissionService, load_task_in_event};
use crate::errors::{HackHubError, Result};
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::submissions::entities::{Submission, SubmissionType};
use crate::models::submissions::requests::CreateSubmissionRequest;
use crate::services::access::{current_actor, ensure_team_access, load_event_for};

pub async fn create_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    event_id: i64,
    req: CreateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let result: Result<Submission> = async {
        let actor = current_actor(request)?;
        let event = load_event_for(storage.as_ref(), &actor, event_id).await?;

        // 参赛者默认提交到自己的团队
        let team_id = req
            .team_id
            .or(actor.team_id)
            .ok_or_else(|| HackHubError::validation("缺少 team_id"))?;
        ensure_team_access(&actor, team_id)?;
        storage
            .get_team_by_id(team_id)
            .await?
            .filter(|t| t.event_id == event.id)
            .ok_or_else(|| HackHubError::not_found(format!("团队 {team_id} 不存在")))?;

        let task = load_task_in_event(storage.as_ref(), event.id, req.task_id).await?;

        let submission = storage
            .create_submission(
                actor.id,
                team_id,
                task.id,
                req.content,
                req.submission_type.unwrap_or(SubmissionType::Provisional),
            )
            .await?;
        info!(
            "Submission {} created for task {} by team {} (actor {})",
            submission.id, task.id, team_id, actor.id
        );
        service.invalidate_tracking(request, event.id).await;
        Ok(submission)
    }
    .await;

    match result {
        Ok(submission) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(submission, "提交成功")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
