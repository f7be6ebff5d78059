use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::evaluations::requests::{EvaluationListParams, EvaluationListQuery};
use crate::models::evaluations::responses::EvaluationListResponse;

/// 分页列出评审；current_only 时每个 (范围, 目标, 评审人) 只保留最新草稿与 final
pub async fn list_evaluations(
    service: &EvaluationService,
    request: &HttpRequest,
    event_id: i64,
    params: EvaluationListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let result: Result<EvaluationListResponse> = async {
        let (_, event) = service.actor_and_event(request, event_id).await?;
        storage
            .list_evaluations(EvaluationListQuery::from_params(event.id, params))
            .await
    }
    .await;

    match result {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list, "查询成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}
