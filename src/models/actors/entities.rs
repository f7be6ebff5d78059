use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 调用者角色，由外部认证系统签发在令牌中
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/actor.ts")]
pub enum ActorRole {
    Participant, // 参赛者
    Reviewer,    // 评审
    Organizer,   // 组织者
    Admin,       // 管理员
}

impl ActorRole {
    pub const PARTICIPANT: &'static str = "participant";
    pub const REVIEWER: &'static str = "reviewer";
    pub const ORGANIZER: &'static str = "organizer";
    pub const ADMIN: &'static str = "admin";

    pub fn organizer_roles() -> &'static [ActorRole] {
        &[ActorRole::Organizer, ActorRole::Admin]
    }
    pub fn reviewer_roles() -> &'static [ActorRole] {
        &[ActorRole::Reviewer, ActorRole::Organizer, ActorRole::Admin]
    }
}

impl<'de> Deserialize<'de> for ActorRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ActorRole::Participant => ActorRole::PARTICIPANT,
            ActorRole::Reviewer => ActorRole::REVIEWER,
            ActorRole::Organizer => ActorRole::ORGANIZER,
            ActorRole::Admin => ActorRole::ADMIN,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ActorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ActorRole::PARTICIPANT => Ok(ActorRole::Participant),
            ActorRole::REVIEWER => Ok(ActorRole::Reviewer),
            ActorRole::ORGANIZER => Ok(ActorRole::Organizer),
            ActorRole::ADMIN => Ok(ActorRole::Admin),
            _ => Err(format!(
                "无效的角色: '{s}'. 支持的角色: participant, reviewer, organizer, admin"
            )),
        }
    }
}

/// 已认证的调用者
///
/// 身份、租户与角色全部来自令牌声明，不做存储查询。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/actor.ts")]
pub struct Actor {
    pub id: i64,
    pub tenant_id: i64,
    pub role: ActorRole,
    // 参赛者所属团队（仅 participant 有意义）
    pub team_id: Option<i64>,
}

impl Actor {
    pub fn has_any_role(&self, roles: &[ActorRole]) -> bool {
        roles.contains(&self.role)
    }

    pub fn is_organizer(&self) -> bool {
        self.has_any_role(ActorRole::organizer_roles())
    }

    pub fn is_reviewer(&self) -> bool {
        self.has_any_role(ActorRole::reviewer_roles())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        let role: ActorRole = "reviewer".parse().unwrap();
        assert_eq!(role, ActorRole::Reviewer);
        assert_eq!(role.to_string(), "reviewer");
        assert!("teacher".parse::<ActorRole>().is_err());
    }

    #[test]
    fn test_reviewer_roles_include_organizer() {
        let actor = Actor {
            id: 1,
            tenant_id: 1,
            role: ActorRole::Organizer,
            team_id: None,
        };
        assert!(actor.is_reviewer());
        assert!(actor.is_organizer());
    }
}
