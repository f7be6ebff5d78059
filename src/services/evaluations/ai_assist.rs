use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::evaluations::entities::Evaluation;
use crate::models::evaluations::requests::AiAssistRequest;

/// 生成 AI 辅助草稿
///
/// 未配置评分规则返回 409；预言机不可用或超时返回 503，可重试，不写入任何记录。
pub async fn ai_assist(
    service: &EvaluationService,
    request: &HttpRequest,
    event_id: i64,
    req: AiAssistRequest,
) -> ActixResult<HttpResponse> {
    let result: Result<Evaluation> = async {
        let (actor, event) = service.actor_and_event(request, event_id).await?;
        service
            .lifecycle(request)
            .generate_ai_draft(&actor, &event, req)
            .await
    }
    .await;

    match result {
        Ok(evaluation) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(evaluation, "AI 评审草稿已生成")))
        }
        Err(e) => {
            let mut response = error_response(&e);
            if e.is_retryable() {
                response.headers_mut().insert(
                    actix_web::http::header::RETRY_AFTER,
                    actix_web::http::header::HeaderValue::from_static("30"),
                );
            }
            Ok(response)
        }
    }
}
