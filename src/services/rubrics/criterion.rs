use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::criteria::{validate_criterion_input, validate_criterion_update};
use super::{RubricService, load_rubric_in_event};
use crate::errors::{HackHubError, Result};
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::rubrics::entities::{PhaseRubric, RubricCriterion};
use crate::models::rubrics::requests::{CriterionInput, UpdateCriterionRequest};
use crate::services::access::{current_actor, load_event_for};
use crate::storage::Storage;

async fn check_event(
    service: &RubricService,
    request: &HttpRequest,
    event_id: i64,
    rubric_id: i64,
) -> Result<(std::sync::Arc<dyn Storage>, PhaseRubric)> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    load_event_for(storage.as_ref(), &actor, event_id).await?;
    let rubric = load_rubric_in_event(storage.as_ref(), event_id, rubric_id).await?;
    Ok((storage, rubric))
}

// 细则必须属于路径中的评分规则
async fn load_criterion(
    storage: &dyn Storage,
    rubric_id: i64,
    criterion_id: i64,
) -> Result<RubricCriterion> {
    storage
        .get_criterion_by_id(criterion_id)
        .await?
        .filter(|c| c.rubric_id == rubric_id)
        .ok_or_else(|| HackHubError::not_found(format!("细则 {criterion_id} 不存在")))
}

pub async fn add_criterion(
    service: &RubricService,
    request: &HttpRequest,
    event_id: i64,
    rubric_id: i64,
    input: CriterionInput,
) -> ActixResult<HttpResponse> {
    let result: Result<RubricCriterion> = async {
        let (storage, rubric) = check_event(service, request, event_id, rubric_id).await?;
        validate_criterion_input(&input, rubric.scale_max)?;
        storage.add_criterion(rubric_id, input).await
    }
    .await;

    match result {
        Ok(criterion) => {
            info!("Criterion {} added to rubric {}", criterion.id, rubric_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(criterion, "细则添加成功")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn update_criterion(
    service: &RubricService,
    request: &HttpRequest,
    event_id: i64,
    rubric_id: i64,
    criterion_id: i64,
    req: UpdateCriterionRequest,
) -> ActixResult<HttpResponse> {
    let result: Result<RubricCriterion> = async {
        let (storage, rubric) = check_event(service, request, event_id, rubric_id).await?;
        validate_criterion_update(&req, rubric.scale_max)?;
        load_criterion(storage.as_ref(), rubric_id, criterion_id).await?;
        storage
            .update_criterion(criterion_id, req)
            .await?
            .ok_or_else(|| HackHubError::not_found(format!("细则 {criterion_id} 不存在")))
    }
    .await;

    match result {
        Ok(criterion) => Ok(HttpResponse::Ok().json(ApiResponse::success(criterion, "细则更新成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// 删除细则不受历史评审快照限制
pub async fn delete_criterion(
    service: &RubricService,
    request: &HttpRequest,
    event_id: i64,
    rubric_id: i64,
    criterion_id: i64,
) -> ActixResult<HttpResponse> {
    let result: Result<bool> = async {
        let (storage, _) = check_event(service, request, event_id, rubric_id).await?;
        load_criterion(storage.as_ref(), rubric_id, criterion_id).await?;
        storage.delete_criterion(criterion_id).await
    }
    .await;

    match result {
        Ok(true) => {
            info!("Criterion {} removed from rubric {}", criterion_id, rubric_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("细则删除成功")))
        }
        Ok(false) => Ok(error_response(&HackHubError::not_found(format!(
            "细则 {criterion_id} 不存在"
        )))),
        Err(e) => Ok(error_response(&e)),
    }
}
