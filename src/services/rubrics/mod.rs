pub mod catalog;
pub mod create;
pub mod criteria;
pub mod criterion;
pub mod detail;
pub mod resolve;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{HackHubError, Result};
use crate::models::rubrics::entities::PhaseRubric;
use crate::models::rubrics::requests::{
    CreateRubricRequest, CriterionInput, ResolveRubricParams, UpdateCriterionRequest,
    UpdateRubricRequest,
};
use crate::storage::Storage;

pub use catalog::{get_project_rubric, get_rubric_for, select_rubric};

pub struct RubricService {
    storage: Option<Arc<dyn Storage>>,
}

impl RubricService {
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

    pub async fn create_rubric(
        &self,
        request: &HttpRequest,
        event_id: i64,
        req: CreateRubricRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_rubric(self, request, event_id, req).await
    }

    pub async fn get_rubric(
        &self,
        request: &HttpRequest,
        event_id: i64,
        rubric_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_rubric(self, request, event_id, rubric_id).await
    }

    pub async fn resolve_rubric(
        &self,
        request: &HttpRequest,
        event_id: i64,
        params: ResolveRubricParams,
    ) -> ActixResult<HttpResponse> {
        resolve::resolve_rubric(self, request, event_id, params).await
    }

    pub async fn update_rubric(
        &self,
        request: &HttpRequest,
        event_id: i64,
        rubric_id: i64,
        req: UpdateRubricRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_rubric(self, request, event_id, rubric_id, req).await
    }

    pub async fn add_criterion(
        &self,
        request: &HttpRequest,
        event_id: i64,
        rubric_id: i64,
        input: CriterionInput,
    ) -> ActixResult<HttpResponse> {
        criterion::add_criterion(self, request, event_id, rubric_id, input).await
    }

    pub async fn update_criterion(
        &self,
        request: &HttpRequest,
        event_id: i64,
        rubric_id: i64,
        criterion_id: i64,
        req: UpdateCriterionRequest,
    ) -> ActixResult<HttpResponse> {
        criterion::update_criterion(self, request, event_id, rubric_id, criterion_id, req).await
    }

    pub async fn delete_criterion(
        &self,
        request: &HttpRequest,
        event_id: i64,
        rubric_id: i64,
        criterion_id: i64,
    ) -> ActixResult<HttpResponse> {
        criterion::delete_criterion(self, request, event_id, rubric_id, criterion_id).await
    }
}

/// 加载评分规则，并确认其所在阶段属于该活动
pub(crate) async fn load_rubric_in_event(
    storage: &dyn Storage,
    event_id: i64,
    rubric_id: i64,
) -> Result<PhaseRubric> {
    let not_found = || HackHubError::not_found(format!("评分规则 {rubric_id} 不存在"));

    let rubric = storage.get_rubric_by_id(rubric_id).await?.ok_or_else(not_found)?;
    match storage.get_phase_by_id(rubric.phase_id).await? {
        Some(phase) if phase.event_id == event_id => Ok(rubric),
        _ => Err(not_found()),
    }
}
