use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::evaluations::entities::Evaluation;

pub async fn get_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    event_id: i64,
    evaluation_id: i64,
) -> ActixResult<HttpResponse> {
    let result: Result<Evaluation> = async {
        let (_, event) = service.actor_and_event(request, event_id).await?;
        service.lifecycle(request).get(&event, evaluation_id).await
    }
    .await;

    match result {
        Ok(evaluation) => Ok(HttpResponse::Ok().json(ApiResponse::success(evaluation, "查询成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}
