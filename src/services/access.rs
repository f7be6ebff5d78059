//! 服务层共用的访问检查

use std::sync::Arc;

use actix_web::{HttpRequest, web};

use crate::errors::{HackHubError, Result};
use crate::middlewares::RequireJWT;
use crate::models::actors::entities::Actor;
use crate::models::events::entities::Event;
use crate::storage::Storage;

/// 当前调用者；路由未挂 RequireJWT 时视为未认证
pub fn current_actor(request: &HttpRequest) -> Result<Actor> {
    RequireJWT::extract_actor(request)
        .ok_or_else(|| HackHubError::authentication("未登录或令牌无效"))
}

/// 读取应用共享数据
pub(crate) fn shared<T: ?Sized + 'static>(request: &HttpRequest) -> Option<Arc<T>> {
    request
        .app_data::<web::Data<Arc<T>>>()
        .map(|data| data.get_ref().clone())
}

/// 加载活动并校验租户；跨租户访问与不存在一样返回 404
pub async fn load_event_for(storage: &dyn Storage, actor: &Actor, event_id: i64) -> Result<Event> {
    match storage.get_event_by_id(event_id).await? {
        Some(event) if event.tenant_id == actor.tenant_id => Ok(event),
        _ => Err(HackHubError::not_found(format!("活动 {event_id} 不存在"))),
    }
}

/// 参与者只能操作自己团队的数据
pub fn ensure_team_access(actor: &Actor, team_id: i64) -> Result<()> {
    if actor.is_organizer() || actor.is_reviewer() || actor.team_id == Some(team_id) {
        Ok(())
    } else {
        Err(HackHubError::authorization("无权访问其他团队的数据"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::actors::entities::ActorRole;

    fn actor(role: ActorRole, team_id: Option<i64>) -> Actor {
        Actor {
            id: 1,
            tenant_id: 1,
            role,
            team_id,
        }
    }

    #[test]
    fn test_team_access() {
        assert!(ensure_team_access(&actor(ActorRole::Participant, Some(3)), 3).is_ok());
        assert!(ensure_team_access(&actor(ActorRole::Participant, Some(3)), 4).is_err());
        assert!(ensure_team_access(&actor(ActorRole::Participant, None), 4).is_err());
        assert!(ensure_team_access(&actor(ActorRole::Reviewer, None), 4).is_ok());
        assert!(ensure_team_access(&actor(ActorRole::Organizer, None), 4).is_ok());
    }
}
