pub mod build;
pub mod matrix;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::models::tracking::requests::TrackingParams;
use crate::storage::Storage;

pub use build::load_tracking_matrix;
pub use matrix::build_tracking_matrix;

/// 跟踪矩阵的缓存键，每个活动按 final_only 各缓存一份
pub fn tracking_cache_key(event_id: i64, final_only: bool) -> String {
    format!(
        "tracking:{event_id}:{}",
        if final_only { "final" } else { "all" }
    )
}

/// 活动内任何提交或评审写入后调用
pub async fn invalidate_tracking_cache(cache: Option<&Arc<dyn ObjectCache>>, event_id: i64) {
    if let Some(cache) = cache {
        cache.remove(&tracking_cache_key(event_id, false)).await;
        cache.remove(&tracking_cache_key(event_id, true)).await;
    }
}

pub struct TrackingService {
    storage: Option<Arc<dyn Storage>>,
}

impl TrackingService {
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

    pub async fn build_matrix(
        &self,
        request: &HttpRequest,
        event_id: i64,
        params: TrackingParams,
    ) -> ActixResult<HttpResponse> {
        build::build_matrix(self, request, event_id, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_per_filter() {
        assert_eq!(tracking_cache_key(3, false), "tracking:3:all");
        assert_eq!(tracking_cache_key(3, true), "tracking:3:final");
    }
}
