pub mod ai_assist;
pub mod create;
pub mod detail;
pub mod lifecycle;
pub mod list;
pub mod promote;
pub mod scope;
pub mod scoring;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::ai::ScoringOracle;
use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::actors::entities::Actor;
use crate::models::evaluations::requests::{
    AiAssistRequest, CreateEvaluationRequest, EvaluationListParams, UpdateEvaluationRequest,
};
use crate::models::events::entities::Event;
use crate::services::access::{current_actor, load_event_for, shared};
use crate::services::notifications::EvaluationNotifier;
use crate::storage::Storage;

pub use lifecycle::{DraftInput, EvaluationLifecycle, EvaluationPolicy};

pub struct EvaluationService {
    storage: Option<Arc<dyn Storage>>,
}

impl EvaluationService {
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

    /// 用请求中的共享组件组装生命周期管理器
    pub(crate) fn lifecycle(&self, request: &HttpRequest) -> EvaluationLifecycle {
        EvaluationLifecycle::new(
            self.get_storage(request),
            EvaluationPolicy::from_config(AppConfig::get()),
        )
        .with_cache(shared::<dyn ObjectCache>(request))
        .with_oracle(shared::<dyn ScoringOracle>(request))
        .with_notifier(
            request
                .app_data::<web::Data<EvaluationNotifier>>()
                .map(|n| n.get_ref().clone()),
        )
    }

    /// 调用者与其租户下的活动
    pub(crate) async fn actor_and_event(
        &self,
        request: &HttpRequest,
        event_id: i64,
    ) -> Result<(Actor, Event)> {
        let actor = current_actor(request)?;
        let event = load_event_for(self.get_storage(request).as_ref(), &actor, event_id).await?;
        Ok((actor, event))
    }

    pub async fn create_evaluation(
        &self,
        request: &HttpRequest,
        event_id: i64,
        req: CreateEvaluationRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_evaluation(self, request, event_id, req).await
    }

    pub async fn get_evaluation(
        &self,
        request: &HttpRequest,
        event_id: i64,
        evaluation_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_evaluation(self, request, event_id, evaluation_id).await
    }

    pub async fn list_evaluations(
        &self,
        request: &HttpRequest,
        event_id: i64,
        params: EvaluationListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_evaluations(self, request, event_id, params).await
    }

    pub async fn update_evaluation(
        &self,
        request: &HttpRequest,
        event_id: i64,
        evaluation_id: i64,
        req: UpdateEvaluationRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_evaluation(self, request, event_id, evaluation_id, req).await
    }

    pub async fn promote_evaluation(
        &self,
        request: &HttpRequest,
        event_id: i64,
        evaluation_id: i64,
    ) -> ActixResult<HttpResponse> {
        promote::promote_evaluation(self, request, event_id, evaluation_id).await
    }

    pub async fn ai_assist(
        &self,
        request: &HttpRequest,
        event_id: i64,
        req: AiAssistRequest,
    ) -> ActixResult<HttpResponse> {
        ai_assist::ai_assist(self, request, event_id, req).await
    }
}
