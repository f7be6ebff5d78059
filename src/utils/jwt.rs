//! 访问令牌校验
//!
//! 令牌由外部认证系统签发，本服务只负责校验并还原调用者身份。

use crate::config::AppConfig;
use crate::models::actors::entities::{Actor, ActorRole};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,          // Subject (actor ID)
    pub tenant_id: i64,       // 所属租户
    pub role: String,         // 角色
    #[serde(default)]
    pub team_id: Option<i64>, // 参赛者所属团队
    #[serde(default = "default_token_type")]
    pub token_type: String, // token类型，只接受 "access"
    pub exp: usize,           // Expiration time (时间戳)
    pub iat: usize,           // Issued at (签发时间)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

fn default_token_type() -> String {
    "access".to_string()
}

impl Claims {
    /// 转换为调用者身份
    pub fn into_actor(self) -> Result<Actor, String> {
        let id = self
            .sub
            .parse::<i64>()
            .map_err(|_| "Invalid actor ID in JWT".to_string())?;
        let role: ActorRole = self.role.parse()?;

        Ok(Actor {
            id,
            tenant_id: self.tenant_id,
            role,
            team_id: self.team_id,
        })
    }
}

pub struct JwtUtils;

impl JwtUtils {
    /// 使用全局配置校验 access token
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let jwt = &AppConfig::get().jwt;
        Self::verify_with_secret(token, &jwt.secret, jwt.issuer.as_deref())
    }

    pub fn verify_with_secret(
        token: &str,
        secret: &str,
        issuer: Option<&str>,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let mut validation = Validation::default();
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        let claims = decode::<Claims>(token, &decoding_key, &validation)?.claims;
        if claims.token_type != "access" {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-secret-for-hackhub";

    fn issue(role: &str, token_type: &str) -> String {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: "42".into(),
            tenant_id: 7,
            role: role.into(),
            team_id: None,
            token_type: token_type.into(),
            exp: (now + chrono::Duration::minutes(10)).timestamp() as usize,
            iat: now.timestamp() as usize,
            iss: None,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_and_into_actor() {
        let token = issue("reviewer", "access");
        let actor = JwtUtils::verify_with_secret(&token, SECRET, None)
            .unwrap()
            .into_actor()
            .unwrap();
        assert_eq!(actor.id, 42);
        assert_eq!(actor.tenant_id, 7);
        assert_eq!(actor.role, ActorRole::Reviewer);
    }

    #[test]
    fn test_rejects_refresh_token() {
        let token = issue("reviewer", "refresh");
        assert!(JwtUtils::verify_with_secret(&token, SECRET, None).is_err());
    }

    #[test]
    fn test_rejects_wrong_secret() {
        let token = issue("admin", "access");
        assert!(JwtUtils::verify_with_secret(&token, "other", None).is_err());
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let token = issue("teacher", "access");
        let claims = JwtUtils::verify_with_secret(&token, SECRET, None).unwrap();
        assert!(claims.into_actor().is_err());
    }
}
