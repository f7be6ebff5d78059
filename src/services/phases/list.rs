use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::PhaseService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::phases::entities::{Phase, Task};
use crate::models::phases::responses::{PhaseListResponse, PhaseWithTasks};
use crate::services::access::{current_actor, load_event_for};
use crate::services::ordering::{compare_phases, compare_tasks};

/// 阶段按展示顺序排列，每个阶段附带排好序的任务
pub fn group_phases(mut phases: Vec<Phase>, mut tasks: Vec<Task>) -> Vec<PhaseWithTasks> {
    phases.sort_by(compare_phases);
    tasks.sort_by(compare_tasks);

    let mut by_phase: HashMap<i64, Vec<Task>> = HashMap::new();
    for task in tasks {
        by_phase.entry(task.phase_id).or_default().push(task);
    }

    phases
        .into_iter()
        .map(|phase| {
            let tasks = by_phase.remove(&phase.id).unwrap_or_default();
            PhaseWithTasks { phase, tasks }
        })
        .collect()
}

pub async fn list_phases(
    service: &PhaseService,
    request: &HttpRequest,
    event_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let result: Result<PhaseListResponse> = async {
        let actor = current_actor(request)?;
        let event = load_event_for(storage.as_ref(), &actor, event_id).await?;
        let phases = storage.list_event_phases(event.id).await?;
        let tasks = storage.list_event_tasks(event.id).await?;
        Ok(PhaseListResponse {
            items: group_phases(phases, tasks),
        })
    }
    .await;

    match result {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list, "查询成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}
