use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{DraftInput, EvaluationService};
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::evaluations::entities::{Evaluation, EvaluationSource};
use crate::models::evaluations::requests::CreateEvaluationRequest;

pub async fn create_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    event_id: i64,
    req: CreateEvaluationRequest,
) -> ActixResult<HttpResponse> {
    let result: Result<Evaluation> = async {
        let (actor, event) = service.actor_and_event(request, event_id).await?;
        let target = req.refs.into_target()?;
        let input = DraftInput {
            comment: req.comment,
            score: req.score,
            criterion_scores: req.criterion_scores,
            evaluated_submission_ids: req.evaluated_submission_ids,
            source: EvaluationSource::Manual,
        };
        service
            .lifecycle(request)
            .create_draft(&actor, &event, target, input)
            .await
    }
    .await;

    match result {
        Ok(evaluation) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(evaluation, "评审草稿创建成功")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
