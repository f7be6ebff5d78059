use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::evaluations::entities::Evaluation;

/// 草稿转为 final；目标已有 final 时返回 409
pub async fn promote_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    event_id: i64,
    evaluation_id: i64,
) -> ActixResult<HttpResponse> {
    let result: Result<Evaluation> = async {
        let (actor, event) = service.actor_and_event(request, event_id).await?;
        service
            .lifecycle(request)
            .promote_to_final(&actor, &event, evaluation_id)
            .await
    }
    .await;

    match result {
        Ok(evaluation) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(evaluation, "评审已提交为 final")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
