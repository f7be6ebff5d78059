/*!
 * 速率限制中间件
 *
 * 固定窗口计数。每个限制器持有自己的计数缓存，窗口长度即缓存条目的存活时间，
 * 计数键为 `前缀:actor:{id}`，未认证请求退化为客户端 IP。
 *
 * ```rust,ignore
 * web::resource("/ai-assist")
 *     .wrap(RateLimit::ai_assist())
 *     .route(web::post().to(ai_assist))
 * ```
 *
 * 超过限制返回 429，并带 `Retry-After` 头。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use std::net::IpAddr;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tracing::warn;

use crate::models::actors::entities::Actor;
use crate::models::{ApiResponse, ErrorCode};

type Counters = Cache<String, Arc<AtomicU32>>;

/// 速率限制配置
#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
    counters: Counters,
}

impl RateLimit {
    /// 创建新的速率限制器：`window_secs` 秒内最多 `max_requests` 次
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        let counters = Cache::builder()
            .time_to_live(Duration::from_secs(window_secs.max(1)))
            .max_capacity(100_000)
            .build();
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
            counters,
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// AI 辅助评审：10次/分钟/调用者，模型调用开销大
    pub fn ai_assist() -> Self {
        Self::new(10, 60).with_prefix("ai_assist")
    }

    fn counter_key(&self, identifier: &str) -> String {
        if self.key_prefix.is_empty() {
            identifier.to_string()
        } else {
            format!("{}:{}", self.key_prefix, identifier)
        }
    }

    /// 记录一次请求，返回记录后的计数；超过上限时返回 None
    async fn hit(&self, key: String) -> Option<u32> {
        let counter = self
            .counters
            .get_with(key, async { Arc::new(AtomicU32::new(0)) })
            .await;
        let count = counter.fetch_add(1, Ordering::AcqRel) + 1;
        (count <= self.max_requests).then_some(count)
    }
}

// 客户端 IP，只接受能解析的地址
fn extract_client_ip(req: &ServiceRequest) -> String {
    let info = req.connection_info();
    info.realip_remote_addr()
        .and_then(|addr| {
            let host = addr.split(',').next().unwrap_or(addr).trim();
            host.parse::<IpAddr>().ok()
        })
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn request_identifier(req: &ServiceRequest) -> String {
    match req.extensions().get::<Actor>() {
        Some(actor) => format!("actor:{}", actor.id),
        None => format!("ip:{}", extract_client_ip(req)),
    }
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "请求过于频繁，请稍后再试",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let key = limit.counter_key(&request_identifier(&req));

            let Some(count) = limit.hit(key.clone()).await else {
                warn!(
                    "Rate limit exceeded for key: {} (limit {}/{}s)",
                    key, limit.max_requests, limit.window_secs
                );
                return Ok(req.into_response(
                    create_rate_limit_response(limit.window_secs).map_into_right_body(),
                ));
            };

            req.extensions_mut().insert(RateLimitInfo {
                remaining: limit.max_requests.saturating_sub(count),
                limit: limit.max_requests,
                reset: limit.window_secs,
            });

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

/// 本次请求的限流状态
#[derive(Clone)]
pub struct RateLimitInfo {
    pub remaining: u32,
    pub limit: u32,
    pub reset: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let ai = RateLimit::ai_assist();
        assert_eq!(ai.max_requests, 10);
        assert_eq!(ai.window_secs, 60);
        assert_eq!(ai.counter_key("actor:7"), "ai_assist:actor:7");

        let plain = RateLimit::new(1, 1);
        assert_eq!(plain.counter_key("ip:1.2.3.4"), "ip:1.2.3.4");
    }

    #[tokio::test]
    async fn test_hit_stops_at_limit() {
        let limit = RateLimit::new(2, 60).with_prefix("t");
        assert_eq!(limit.hit("t:actor:1".into()).await, Some(1));
        assert_eq!(limit.hit("t:actor:1".into()).await, Some(2));
        assert_eq!(limit.hit("t:actor:1".into()).await, None);
        // 其他调用者不受影响
        assert_eq!(limit.hit("t:actor:2".into()).await, Some(1));
    }
}
