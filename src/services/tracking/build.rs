use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::{TrackingService, build_tracking_matrix, tracking_cache_key};
use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::submissions::requests::SubmissionListParams;
use crate::models::tracking::requests::TrackingParams;
use crate::models::tracking::responses::TrackingMatrix;
use crate::services::access::{current_actor, load_event_for, shared};
use crate::storage::Storage;

/// 读取事件全部数据并构建矩阵
pub async fn load_tracking_matrix(
    storage: &dyn Storage,
    event_id: i64,
    final_only: bool,
) -> Result<TrackingMatrix> {
    let phases = storage.list_event_phases(event_id).await?;
    let tasks = storage.list_event_tasks(event_id).await?;
    let teams = storage.list_event_teams(event_id).await?;
    let submissions = storage
        .list_event_submissions(event_id, SubmissionListParams::default())
        .await?;
    let evaluations = storage.list_event_final_evaluations(event_id).await?;

    Ok(build_tracking_matrix(
        event_id,
        final_only,
        phases,
        tasks,
        teams,
        &submissions,
        &evaluations,
    ))
}

pub async fn build_matrix(
    service: &TrackingService,
    request: &HttpRequest,
    event_id: i64,
    params: TrackingParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let cache = shared::<dyn ObjectCache>(request);
    let ttl = AppConfig::get().evaluation.tracking_cache_ttl;

    let result: Result<TrackingMatrix> = async {
        let actor = current_actor(request)?;
        let event = load_event_for(storage.as_ref(), &actor, event_id).await?;
        let key = tracking_cache_key(event.id, params.final_only);

        // ttl 为 0 时不缓存
        let cache = cache.filter(|_| ttl > 0);
        if let Some(cache) = &cache
            && let CacheResult::Found(matrix) = cache.get_json::<TrackingMatrix>(&key).await
        {
            debug!("Tracking matrix cache hit: {}", key);
            return Ok(matrix);
        }

        let matrix = load_tracking_matrix(storage.as_ref(), event.id, params.final_only).await?;
        if let Some(cache) = &cache {
            cache.insert_json(key, &matrix, ttl).await;
        }
        Ok(matrix)
    }
    .await;

    match result {
        Ok(matrix) => Ok(HttpResponse::Ok().json(ApiResponse::success(matrix, "查询成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}
