use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{PhaseService, load_phase_in_event};
use crate::errors::{HackHubError, Result};
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::phases::entities::Task;
use crate::models::phases::requests::{CreateTaskRequest, UpdateTaskRequest};
use crate::services::access::{current_actor, load_event_for};
use crate::services::ordering::{compare_phases, compare_tasks};
use crate::storage::Storage;
use crate::utils::validate::validate_title;

// 绑定的评分规则必须属于任务所在阶段
async fn ensure_rubric_in_phase(storage: &dyn Storage, phase_id: i64, rubric_id: i64) -> Result<()> {
    match storage.get_rubric_by_id(rubric_id).await? {
        Some(rubric) if rubric.phase_id == phase_id => Ok(()),
        _ => Err(HackHubError::validation(format!(
            "评分规则 {rubric_id} 不属于阶段 {phase_id}"
        ))),
    }
}

pub async fn create_task(
    service: &PhaseService,
    request: &HttpRequest,
    event_id: i64,
    phase_id: i64,
    req: CreateTaskRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let result: Result<Task> = async {
        let actor = current_actor(request)?;
        let event = load_event_for(storage.as_ref(), &actor, event_id).await?;
        let phase = load_phase_in_event(storage.as_ref(), event.id, phase_id).await?;
        validate_title(&req.title).map_err(HackHubError::validation)?;
        if let Some(rubric_id) = req.rubric_id {
            ensure_rubric_in_phase(storage.as_ref(), phase.id, rubric_id).await?;
        }

        let task = storage.create_task(phase.id, req).await?;
        info!("Task {} created in phase {} by actor {}", task.id, phase.id, actor.id);
        service.invalidate_tracking(request, event.id).await;
        Ok(task)
    }
    .await;

    match result {
        Ok(task) => Ok(HttpResponse::Created().json(ApiResponse::success(task, "任务创建成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn list_tasks(
    service: &PhaseService,
    request: &HttpRequest,
    event_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let result: Result<Vec<Task>> = async {
        let actor = current_actor(request)?;
        let event = load_event_for(storage.as_ref(), &actor, event_id).await?;
        let mut phases = storage.list_event_phases(event.id).await?;
        phases.sort_by(compare_phases);
        let phase_rank = |phase_id: i64| phases.iter().position(|p| p.id == phase_id);

        let mut tasks = storage.list_event_tasks(event.id).await?;
        tasks.sort_by(|a, b| {
            phase_rank(a.phase_id)
                .cmp(&phase_rank(b.phase_id))
                .then_with(|| compare_tasks(a, b))
        });
        Ok(tasks)
    }
    .await;

    match result {
        Ok(tasks) => Ok(HttpResponse::Ok().json(ApiResponse::success(tasks, "查询成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn update_task(
    service: &PhaseService,
    request: &HttpRequest,
    event_id: i64,
    task_id: i64,
    req: UpdateTaskRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let result: Result<Task> = async {
        let actor = current_actor(request)?;
        let event = load_event_for(storage.as_ref(), &actor, event_id).await?;
        let task = storage
            .get_task_by_id(task_id)
            .await?
            .ok_or_else(|| HackHubError::not_found(format!("任务 {task_id} 不存在")))?;
        load_phase_in_event(storage.as_ref(), event.id, task.phase_id)
            .await
            .map_err(|_| HackHubError::not_found(format!("任务 {task_id} 不存在")))?;

        if let Some(title) = &req.title {
            validate_title(title).map_err(HackHubError::validation)?;
        }
        if let Some(rubric_id) = req.rubric_id.filter(|id| *id > 0) {
            ensure_rubric_in_phase(storage.as_ref(), task.phase_id, rubric_id).await?;
        }

        let updated = storage
            .update_task(task.id, req)
            .await?
            .ok_or_else(|| HackHubError::not_found(format!("任务 {task_id} 不存在")))?;
        info!("Task {} updated by actor {}", updated.id, actor.id);
        service.invalidate_tracking(request, event.id).await;
        Ok(updated)
    }
    .await;

    match result {
        Ok(task) => Ok(HttpResponse::Ok().json(ApiResponse::success(task, "任务更新成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}
