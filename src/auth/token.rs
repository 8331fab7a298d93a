//! Bearer token issue/verify (HS256).

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::UserRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    pub role: UserRole,
    pub email: String,
    /// Expiry, seconds since epoch.
    pub exp: i64,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
}

/// Issues and validates the session tokens the SPAs carry in the
/// `Authorization: Bearer` header.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    pub fn issue(&self, user_id: Uuid, role: UserRole, email: &str) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            role,
            email: email.to_string(),
            exp: now + self.ttl_secs,
            iat: now,
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|e| {
            tracing::error!(error = %e, "token encoding failed");
            AppError::Internal
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", 3600)
    }

    #[test]
    fn issue_then_verify() {
        let svc = service();
        let id = Uuid::new_v4();
        let token = svc.issue(id, UserRole::Customer, "c@example.com").unwrap();
        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, UserRole::Customer);
        assert_eq!(claims.email, "c@example.com");
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = TokenService::new("test-secret", -120);
        let token = svc
            .issue(Uuid::new_v4(), UserRole::Admin, "a@example.com")
            .unwrap();
        assert!(matches!(svc.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = service()
            .issue(Uuid::new_v4(), UserRole::Customer, "c@example.com")
            .unwrap();
        let other = TokenService::new("other-secret", 3600);
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(service().verify("not.a.token").is_err());
    }
}
