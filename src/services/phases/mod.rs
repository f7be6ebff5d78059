pub mod create;
pub mod list;
pub mod tasks;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::errors::{HackHubError, Result};
use crate::models::phases::entities::Phase;
use crate::models::phases::requests::{CreatePhaseRequest, CreateTaskRequest, UpdateTaskRequest};
use crate::services::access::shared;
use crate::services::tracking::invalidate_tracking_cache;
use crate::storage::Storage;

pub struct PhaseService {
    storage: Option<Arc<dyn Storage>>,
}

impl PhaseService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 阶段与任务的变化会改变矩阵的列
    pub(crate) async fn invalidate_tracking(&self, request: &HttpRequest, event_id: i64) {
        let cache = shared::<dyn ObjectCache>(request);
        invalidate_tracking_cache(cache.as_ref(), event_id).await;
    }

    pub async fn create_phase(
        &self,
        request: &HttpRequest,
        event_id: i64,
        req: CreatePhaseRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_phase(self, request, event_id, req).await
    }

    pub async fn list_phases(&self, request: &HttpRequest, event_id: i64) -> ActixResult<HttpResponse> {
        list::list_phases(self, request, event_id).await
    }

    pub async fn create_task(
        &self,
        request: &HttpRequest,
        event_id: i64,
        phase_id: i64,
        req: CreateTaskRequest,
    ) -> ActixResult<HttpResponse> {
        tasks::create_task(self, request, event_id, phase_id, req).await
    }

    pub async fn list_tasks(&self, request: &HttpRequest, event_id: i64) -> ActixResult<HttpResponse> {
        tasks::list_tasks(self, request, event_id).await
    }

    pub async fn update_task(
        &self,
        request: &HttpRequest,
        event_id: i64,
        task_id: i64,
        req: UpdateTaskRequest,
    ) -> ActixResult<HttpResponse> {
        tasks::update_task(self, request, event_id, task_id, req).await
    }
}

/// 加载活动内的阶段
pub(crate) async fn load_phase_in_event(
    storage: &dyn Storage,
    event_id: i64,
    phase_id: i64,
) -> Result<Phase> {
    storage
        .get_phase_by_id(phase_id)
        .await?
        .filter(|p| p.event_id == event_id)
        .ok_or_else(|| HackHubError::not_found(format!("阶段 {phase_id} 不存在")))
}
