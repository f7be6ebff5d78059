use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::actors::entities::ActorRole;
use crate::models::rubrics::requests::{
    CreateRubricRequest, CriterionInput, ResolveRubricParams, UpdateCriterionRequest,
    UpdateRubricRequest,
};
use crate::services::RubricService;

// 懒加载的全局 RubricService 实例
static RUBRIC_SERVICE: Lazy<RubricService> = Lazy::new(RubricService::new_lazy);

// 创建评分规则
pub async fn create_rubric(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<CreateRubricRequest>,
) -> ActixResult<HttpResponse> {
    RUBRIC_SERVICE
        .create_rubric(&req, path.into_inner(), body.into_inner())
        .await
}

// 解析阶段/任务生效的评分规则
pub async fn resolve_rubric(
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<ResolveRubricParams>,
) -> ActixResult<HttpResponse> {
    RUBRIC_SERVICE
        .resolve_rubric(&req, path.into_inner(), query.into_inner())
        .await
}

// 获取评分规则详情
pub async fn get_rubric(req: HttpRequest, path: web::Path<(i64, i64)>) -> ActixResult<HttpResponse> {
    let (event_id, rubric_id) = path.into_inner();
    RUBRIC_SERVICE.get_rubric(&req, event_id, rubric_id).await
}

// 更新评分规则
pub async fn update_rubric(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    body: web::Json<UpdateRubricRequest>,
) -> ActixResult<HttpResponse> {
    let (event_id, rubric_id) = path.into_inner();
    RUBRIC_SERVICE
        .update_rubric(&req, event_id, rubric_id, body.into_inner())
        .await
}

// 添加细则
pub async fn add_criterion(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    body: web::Json<CriterionInput>,
) -> ActixResult<HttpResponse> {
    let (event_id, rubric_id) = path.into_inner();
    RUBRIC_SERVICE
        .add_criterion(&req, event_id, rubric_id, body.into_inner())
        .await
}

// 更新细则
pub async fn update_criterion(
    req: HttpRequest,
    path: web::Path<(i64, i64, i64)>,
    body: web::Json<UpdateCriterionRequest>,
) -> ActixResult<HttpResponse> {
    let (event_id, rubric_id, criterion_id) = path.into_inner();
    RUBRIC_SERVICE
        .update_criterion(&req, event_id, rubric_id, criterion_id, body.into_inner())
        .await
}

// 删除细则
pub async fn delete_criterion(
    req: HttpRequest,
    path: web::Path<(i64, i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (event_id, rubric_id, criterion_id) = path.into_inner();
    RUBRIC_SERVICE
        .delete_criterion(&req, event_id, rubric_id, criterion_id)
        .await
}

// 配置路由
pub fn configure_rubric_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/events/{event_id}/rubrics")
            .wrap(RequireJWT)
            .service(
                web::resource("").route(
                    web::post()
                        .to(create_rubric)
                        .wrap(middlewares::RequireRole::new_any(ActorRole::reviewer_roles())),
                ),
            )
            // 必须注册在 /{rubric_id} 之前
            .service(web::resource("/resolve").route(web::get().to(resolve_rubric)))
            .service(
                web::resource("/{rubric_id}")
                    .route(web::get().to(get_rubric))
                    .route(
                        web::put()
                            .to(update_rubric)
                            .wrap(middlewares::RequireRole::new_any(ActorRole::reviewer_roles())),
                    ),
            )
            .service(
                web::scope("/{rubric_id}/criteria")
                    .wrap(middlewares::RequireRole::new_any(ActorRole::reviewer_roles()))
                    .service(web::resource("").route(web::post().to(add_criterion)))
                    .service(
                        web::resource("/{criterion_id}")
                            .route(web::put().to(update_criterion))
                            .route(web::delete().to(delete_criterion)),
                    ),
            ),
    );
}
