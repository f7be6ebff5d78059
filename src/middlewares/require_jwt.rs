/*!
 * JWT 认证中间件
 *
 * 令牌由外部认证系统签发。中间件只校验签名与有效期，并把令牌声明还原为
 * `Actor { id, tenant_id, role, team_id }` 存入请求扩展，不查询存储。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::RequireJWT;
 *
 * App::new().service(
 *     web::scope("/api/v1/events/{event_id}/evaluations")
 *         .wrap(RequireJWT)
 *         .route("", web::get().to(list_evaluations)),
 * )
 * ```
 *
 * 处理程序中通过 `RequireJWT::extract_actor(&req)` 取得调用者。
 */

use crate::models::ErrorCode;
use crate::models::actors::entities::{Actor, ActorRole};
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

// 提取并校验 access token，还原调用者身份
fn extract_actor_from_token(req: &ServiceRequest) -> Result<Actor, String> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    claims.into_actor()
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
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
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_actor_from_token(&req) {
                Ok(actor) => {
                    debug!(
                        "JWT authentication successful for actor {} (tenant {}, role {})",
                        actor.id, actor.tenant_id, actor.role
                    );
                    req.extensions_mut().insert(actor);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取调用者信息
impl RequireJWT {
    /// 从请求扩展中提取调用者
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_actor(req: &actix_web::HttpRequest) -> Option<Actor> {
        req.extensions().get::<Actor>().cloned()
    }

    /// 从请求扩展中提取调用者ID
    pub fn extract_actor_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<Actor>().map(|actor| actor.id)
    }

    /// 从请求扩展中提取调用者角色
    pub fn extract_actor_role(req: &actix_web::HttpRequest) -> Option<ActorRole> {
        req.extensions().get::<Actor>().map(|actor| actor.role)
    }
}
