use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SubmissionService, load_task_in_event};
use crate::errors::{HackHubError, Result};
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::submissions::entities::Submission;
use crate::services::access::{current_actor, ensure_team_access, load_event_for};

/// 提交一经 final 不再回退；重复调用直接返回当前记录
pub async fn finalize_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    event_id: i64,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let result: Result<Submission> = async {
        let actor = current_actor(request)?;
        let event = load_event_for(storage.as_ref(), &actor, event_id).await?;
        let not_found = || HackHubError::not_found(format!("提交 {submission_id} 不存在"));

        let submission = storage
            .get_submission_by_id(submission_id)
            .await?
            .ok_or_else(not_found)?;
        load_task_in_event(storage.as_ref(), event.id, submission.task_id)
            .await
            .map_err(|_| not_found())?;
        ensure_team_access(&actor, submission.team_id)?;

        let finalized = storage
            .finalize_submission(submission.id)
            .await?
            .ok_or_else(not_found)?;
        info!("Submission {} finalized by actor {}", finalized.id, actor.id);
        service.invalidate_tracking(request, event.id).await;
        Ok(finalized)
    }
    .await;

    match result {
        Ok(submission) => Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "提交已确认"))),
        Err(e) => Ok(error_response(&e)),
    }
}
