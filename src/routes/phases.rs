use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::actors::entities::ActorRole;
use crate::models::phases::requests::{CreatePhaseRequest, CreateTaskRequest, UpdateTaskRequest};
use crate::services::PhaseService;

// 懒加载的全局 PhaseService 实例
static PHASE_SERVICE: Lazy<PhaseService> = Lazy::new(PhaseService::new_lazy);

// 列出阶段（含任务）
pub async fn list_phases(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    PHASE_SERVICE.list_phases(&req, path.into_inner()).await
}

// 创建阶段
pub async fn create_phase(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<CreatePhaseRequest>,
) -> ActixResult<HttpResponse> {
    PHASE_SERVICE
        .create_phase(&req, path.into_inner(), body.into_inner())
        .await
}

// 在阶段下创建任务
pub async fn create_task(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    body: web::Json<CreateTaskRequest>,
) -> ActixResult<HttpResponse> {
    let (event_id, phase_id) = path.into_inner();
    PHASE_SERVICE
        .create_task(&req, event_id, phase_id, body.into_inner())
        .await
}

// 列出活动内全部任务
pub async fn list_tasks(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    PHASE_SERVICE.list_tasks(&req, path.into_inner()).await
}

// 更新任务
pub async fn update_task(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    body: web::Json<UpdateTaskRequest>,
) -> ActixResult<HttpResponse> {
    let (event_id, task_id) = path.into_inner();
    PHASE_SERVICE
        .update_task(&req, event_id, task_id, body.into_inner())
        .await
}

// 配置路由
pub fn configure_phase_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/events/{event_id}/phases")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    // 列出阶段 - 所有登录用户可访问
                    .route(web::get().to(list_phases))
                    // 创建阶段 - 仅组织者和管理员
                    .route(
                        web::post()
                            .to(create_phase)
                            .wrap(middlewares::RequireRole::new_any(ActorRole::organizer_roles())),
                    ),
            )
            .service(
                web::resource("/{phase_id}/tasks").route(
                    web::post()
                        .to(create_task)
                        .wrap(middlewares::RequireRole::new_any(ActorRole::organizer_roles())),
                ),
            ),
    );
    cfg.service(
        web::scope("/api/v1/events/{event_id}/tasks")
            .wrap(RequireJWT)
            .service(web::resource("").route(web::get().to(list_tasks)))
            .service(
                web::resource("/{task_id}").route(
                    web::put()
                        .to(update_task)
                        .wrap(middlewares::RequireRole::new_any(ActorRole::organizer_roles())),
                ),
            ),
    );
}
