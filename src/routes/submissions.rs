use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireJWT;
use crate::models::submissions::requests::{CreateSubmissionRequest, SubmissionListParams};
use crate::services::SubmissionService;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 列出提交（参赛者只能看到自己团队的）
pub async fn list_submissions(
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<SubmissionListParams>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(&req, path.into_inner(), query.into_inner())
        .await
}

// 创建提交
pub async fn create_submission(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<CreateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .create_submission(&req, path.into_inner(), body.into_inner())
        .await
}

// 确认提交
pub async fn finalize_submission(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (event_id, submission_id) = path.into_inner();
    SUBMISSION_SERVICE
        .finalize_submission(&req, event_id, submission_id)
        .await
}

// 配置路由
pub fn configure_submission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/events/{event_id}/submissions")
            .wrap(RequireJWT)
            // 权限在业务层按团队检查
            .service(
                web::resource("")
                    .route(web::get().to(list_submissions))
                    .route(web::post().to(create_submission)),
            )
            .service(
                web::resource("/{submission_id}/finalize")
                    .route(web::post().to(finalize_submission)),
            ),
    );
}
