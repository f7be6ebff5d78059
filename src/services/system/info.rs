use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::SystemService;
use crate::ai::ScoringOracle;
use crate::models::system::responses::SystemInfoResponse;
use crate::models::{ApiResponse, AppStartTime};
use crate::services::access::shared;

/// 服务基本信息（公开、只读）
pub async fn get_info(service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let config = service.get_config();
    let now = chrono::Utc::now();
    let started_at = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|t| t.start_datetime)
        .unwrap_or(now);

    // 以实际装配的预言机为准
    let ai_assist_provider = shared::<dyn ScoringOracle>(request)
        .map(|oracle| oracle.name().to_string())
        .unwrap_or_else(|| "disabled".to_string());

    let response = SystemInfoResponse {
        system_name: config.app.system_name.clone(),
        environment: config.app.environment.clone(),
        started_at: started_at.to_rfc3339(),
        uptime_seconds: now.signed_duration_since(started_at).num_seconds(),
        ai_assist_provider,
        final_uniqueness: config.evaluation.final_uniqueness.clone(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}
