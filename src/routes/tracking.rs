use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::actors::entities::ActorRole;
use crate::models::tracking::requests::TrackingParams;
use crate::services::TrackingService;

// 懒加载的全局 TrackingService 实例
static TRACKING_SERVICE: Lazy<TrackingService> = Lazy::new(TrackingService::new_lazy);

// 交付跟踪矩阵
pub async fn get_tracking_matrix(
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<TrackingParams>,
) -> ActixResult<HttpResponse> {
    TRACKING_SERVICE
        .build_matrix(&req, path.into_inner(), query.into_inner())
        .await
}

// 配置路由
pub fn configure_tracking_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/events/{event_id}/tracking")
            .wrap(middlewares::RequireRole::new_any(ActorRole::reviewer_roles()))
            .wrap(RequireJWT)
            .route("", web::get().to(get_tracking_matrix)),
    );
}
