pub mod create;
pub mod finalize;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::errors::{HackHubError, Result};
use crate::models::phases::entities::Task;
use crate::models::submissions::requests::{CreateSubmissionRequest, SubmissionListParams};
use crate::services::access::shared;
use crate::services::tracking::invalidate_tracking_cache;
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
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

    pub(crate) async fn invalidate_tracking(&self, request: &HttpRequest, event_id: i64) {
        let cache = shared::<dyn ObjectCache>(request);
        invalidate_tracking_cache(cache.as_ref(), event_id).await;
    }

    /// 创建提交（草稿）
    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        event_id: i64,
        req: CreateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_submission(self, request, event_id, req).await
    }

    /// 将提交标记为 final
    pub async fn finalize_submission(
        &self,
        request: &HttpRequest,
        event_id: i64,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        finalize::finalize_submission(self, request, event_id, submission_id).await
    }

    /// 列出提交
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        event_id: i64,
        params: SubmissionListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_submissions(self, request, event_id, params).await
    }
}

/// 加载任务并确认其所在阶段属于该活动
pub(crate) async fn load_task_in_event(
    storage: &dyn Storage,
    event_id: i64,
    task_id: i64,
) -> Result<Task> {
    let not_found = || HackHubError::not_found(format!("任务 {task_id} 不存在"));
    let task = storage.get_task_by_id(task_id).await?.ok_or_else(not_found)?;
    match storage.get_phase_by_id(task.phase_id).await? {
        Some(phase) if phase.event_id == event_id => Ok(task),
        _ => Err(not_found()),
    }
}
