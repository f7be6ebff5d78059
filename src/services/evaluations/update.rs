use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::evaluations::entities::Evaluation;
use crate::models::evaluations::requests::UpdateEvaluationRequest;

pub async fn update_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    event_id: i64,
    evaluation_id: i64,
    req: UpdateEvaluationRequest,
) -> ActixResult<HttpResponse> {
    let finalize = req.finalize;
    let result: Result<Evaluation> = async {
        let (actor, event) = service.actor_and_event(request, event_id).await?;
        service
            .lifecycle(request)
            .update(&actor, &event, evaluation_id, req)
            .await
    }
    .await;

    let message = if finalize { "评审已提交为 final" } else { "评审草稿更新成功" };
    match result {
        Ok(evaluation) => Ok(HttpResponse::Ok().json(ApiResponse::success(evaluation, message))),
        Err(e) => Ok(error_response(&e)),
    }
}
