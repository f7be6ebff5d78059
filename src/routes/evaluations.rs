use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit, RequireJWT};
use crate::models::actors::entities::ActorRole;
use crate::models::evaluations::requests::{
    AiAssistRequest, CreateEvaluationRequest, EvaluationListParams, UpdateEvaluationRequest,
};
use crate::services::EvaluationService;

// 懒加载的全局 EvaluationService 实例
static EVALUATION_SERVICE: Lazy<EvaluationService> = Lazy::new(EvaluationService::new_lazy);

// 列出评审
pub async fn list_evaluations(
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<EvaluationListParams>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .list_evaluations(&req, path.into_inner(), query.into_inner())
        .await
}

// 创建评审草稿
pub async fn create_evaluation(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<CreateEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .create_evaluation(&req, path.into_inner(), body.into_inner())
        .await
}

// AI 辅助生成草稿
pub async fn ai_assist(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<AiAssistRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .ai_assist(&req, path.into_inner(), body.into_inner())
        .await
}

// 获取评审详情
pub async fn get_evaluation(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (event_id, evaluation_id) = path.into_inner();
    EVALUATION_SERVICE
        .get_evaluation(&req, event_id, evaluation_id)
        .await
}

// 更新评审草稿
pub async fn update_evaluation(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    body: web::Json<UpdateEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    let (event_id, evaluation_id) = path.into_inner();
    EVALUATION_SERVICE
        .update_evaluation(&req, event_id, evaluation_id, body.into_inner())
        .await
}

// 提交为 final
pub async fn promote_evaluation(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (event_id, evaluation_id) = path.into_inner();
    EVALUATION_SERVICE
        .promote_evaluation(&req, event_id, evaluation_id)
        .await
}

// 配置路由
pub fn configure_evaluation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/events/{event_id}/evaluations")
            // 外层先认证，内层再校验角色与限流
            .wrap(middlewares::RequireRole::new_any(ActorRole::reviewer_roles()))
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_evaluations))
                    .route(web::post().to(create_evaluation)),
            )
            .service(
                web::resource("/ai-assist")
                    .wrap(RateLimit::ai_assist())
                    .route(web::post().to(ai_assist)),
            )
            .service(
                web::resource("/{evaluation_id}")
                    .route(web::get().to(get_evaluation))
                    .route(web::put().to(update_evaluation)),
            )
            .service(
                web::resource("/{evaluation_id}/promote")
                    .route(web::post().to(promote_evaluation)),
            ),
    );
}
