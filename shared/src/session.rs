//! 会话模型
//!
//! 用户信息直接从 Bearer token 的 payload 段解码，不校验签名。
//! 解码结果只用于展示；授权判断始终以后端为准。

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::STORAGE_TOKEN_KEY;
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[serde(alias = "ROLE_ADMIN", alias = "admin")]
    Admin,
    #[default]
    #[serde(alias = "ROLE_USER", alias = "user")]
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthProvider {
    #[default]
    #[serde(alias = "local", alias = "email")]
    Local,
    #[serde(alias = "google")]
    Google,
}

impl AuthProvider {
    /// OAuth 授权路径中的 registration id
    pub fn oauth_slug(&self) -> Option<&'static str> {
        match self {
            AuthProvider::Local => None,
            AuthProvider::Google => Some("google"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuthProvider::Local => "Email",
            AuthProvider::Google => "Google",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub provider: AuthProvider,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn has_local_password(&self) -> bool {
        self.provider == AuthProvider::Local
    }

    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

// =========================================================
// Token 解码
// =========================================================

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token is not a three-part JWT")]
    Malformed,
    #[error("token payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token payload is not valid claims JSON: {0}")]
    Claims(#[from] serde_json::Error),
}

/// JWT payload 中关心的字段
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub provider: AuthProvider,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    pub fn decode(token: &str) -> Result<Self, TokenError> {
        let mut parts = token.trim().split('.');
        let (Some(_header), Some(payload), Some(_signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed);
        };

        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn into_user(self) -> User {
        let email = self.email.unwrap_or(self.sub);
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| display_name_from_email(&email));
        User {
            name,
            email,
            role: self.role,
            provider: self.provider,
        }
    }
}

/// `jane.doe@x.com` -> `Jane Doe`
pub fn display_name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or(email);
    local
        .split(['.', '_'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// =========================================================
// Session
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn from_token(token: impl Into<String>) -> Result<Self, TokenError> {
        let token = token.into();
        let claims = TokenClaims::decode(&token)?;
        let expires_at = claims
            .exp
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single());
        Ok(Self {
            token,
            user: claims.into_user(),
            expires_at,
        })
    }

    /// 从存储中乐观恢复会话，不请求后端。无法解码的 token 会被删除。
    pub fn restore<S: KeyValueStore>(store: &S) -> Option<Self> {
        let token = store.get(STORAGE_TOKEN_KEY)?;
        match Self::from_token(token) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("dropping stored token: {}", e);
                store.delete(STORAGE_TOKEN_KEY);
                None
            }
        }
    }

    pub fn persist<S: KeyValueStore>(&self, store: &S) -> bool {
        store.set(STORAGE_TOKEN_KEY, &self.token)
    }

    pub fn clear<S: KeyValueStore>(store: &S) -> bool {
        store.delete(STORAGE_TOKEN_KEY)
    }

    /// 仅用于展示（例如提示即将过期），不作为授权依据
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    /// 构造未签名的测试 token
    pub(crate) fn make_token(claims: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{}.{}.signature", header, payload)
    }

    #[test]
    fn test_restore_matches_claims() {
        let store = MemoryStore::new();
        let token = make_token(json!({
            "sub": "claire@maison-noir.com",
            "name": "Claire Dubois",
            "role": "ADMIN",
            "provider": "GOOGLE",
            "exp": 1_900_000_000
        }));
        store.set(STORAGE_TOKEN_KEY, &token);

        let session = Session::restore(&store).unwrap();
        assert_eq!(session.token, token);
        assert_eq!(
            session.user,
            User {
                name: "Claire Dubois".to_string(),
                email: "claire@maison-noir.com".to_string(),
                role: Role::Admin,
                provider: AuthProvider::Google,
            }
        );
        assert_eq!(session.expires_at.unwrap().timestamp(), 1_900_000_000);
        assert!(session.is_admin());
    }

    #[test]
    fn test_absent_token_yields_no_session() {
        let store = MemoryStore::new();
        assert!(Session::restore(&store).is_none());
    }

    #[test]
    fn test_garbage_token_is_dropped() {
        let store = MemoryStore::new();
        store.set(STORAGE_TOKEN_KEY, "not-a-jwt");
        assert!(Session::restore(&store).is_none());
        assert!(store.get(STORAGE_TOKEN_KEY).is_none());

        store.set(STORAGE_TOKEN_KEY, "a.!!!.c");
        assert!(Session::restore(&store).is_none());
    }

    #[test]
    fn test_defaults_for_minimal_claims() {
        let token = make_token(json!({ "sub": "jean_luc.picard@example.com" }));
        let session = Session::from_token(token).unwrap();

        assert_eq!(session.user.name, "Jean Luc Picard");
        assert_eq!(session.user.role, Role::User);
        assert_eq!(session.user.provider, AuthProvider::Local);
        assert!(session.expires_at.is_none());
        assert!(!session.is_expired(Utc::now()));
    }

    #[test]
    fn test_spring_style_role_alias() {
        let token = make_token(json!({ "sub": "a@b.c", "role": "ROLE_ADMIN" }));
        assert!(Session::from_token(token).unwrap().is_admin());
    }

    #[test]
    fn test_expiry_is_display_only() {
        let token = make_token(json!({ "sub": "a@b.c", "exp": 1_000 }));
        let session = Session::from_token(token).unwrap();
        assert!(session.is_expired(Utc::now()));
    }

    #[test]
    fn test_initials() {
        let user = TokenClaims::decode(&make_token(json!({"sub": "x@y.z", "name": "claire marie dubois"})))
            .unwrap()
            .into_user();
        assert_eq!(user.initials(), "CM");
    }
}
