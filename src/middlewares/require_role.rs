/*!
 * 基于角色的访问控制中间件
 *
 * 必须在 RequireJWT 之后使用，调用者角色来自令牌声明。
 *
 * ```rust,ignore
 * web::scope("/rubrics")
 *     .wrap(RequireRole::new_any(ActorRole::organizer_roles()))
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::{middlewares::RequireJWT, models::ErrorCode, models::actors::entities::ActorRole};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed_roles: Vec<ActorRole>,
}

impl RequireRole {
    /// 只允许单一角色
    pub fn new(role: ActorRole) -> Self {
        Self {
            allowed_roles: vec![role],
        }
    }

    /// 允许任一角色
    pub fn new_any(roles: &[ActorRole]) -> Self {
        Self {
            allowed_roles: roles.to_vec(),
        }
    }

    fn permits(&self, role: Option<ActorRole>) -> bool {
        role.is_some_and(|r| self.allowed_roles.contains(&r))
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            guard: self.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    guard: RequireRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let guard = self.guard.clone();

        Box::pin(async move {
            let Some(actor_id) = RequireJWT::extract_actor_id(req.request()) else {
                info!("Role check failed: no actor in request, RequireJWT must run first");
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            let role = RequireJWT::extract_actor_role(req.request());
            if guard.permits(role) {
                let res = srv.call(req).await?.map_into_left_body();
                return Ok(res);
            }

            info!(
                "Access denied for actor {} (role: {:?}). Allowed roles: {:?}",
                actor_id, role, guard.allowed_roles
            );
            Ok(req.into_response(
                create_error_response(StatusCode::FORBIDDEN, ErrorCode::Forbidden, "Access denied.")
                    .map_into_right_body(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permits_any_listed_role() {
        let guard = RequireRole::new_any(ActorRole::reviewer_roles());
        assert!(guard.permits(Some(ActorRole::Reviewer)));
        assert!(guard.permits(Some(ActorRole::Admin)));
        assert!(!guard.permits(Some(ActorRole::Participant)));
        assert!(!guard.permits(None));
    }

    #[test]
    fn test_single_role() {
        let guard = RequireRole::new(ActorRole::Admin);
        assert!(guard.permits(Some(ActorRole::Admin)));
        assert!(!guard.permits(Some(ActorRole::Organizer)));
    }
}
