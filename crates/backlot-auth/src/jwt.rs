//! JWT issue and verification.

use backlot_core::Id;
use backlot_models::UserRole;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried by a Backlot bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id).
    pub sub: String,
    /// Expiration (Unix timestamp).
    pub exp: usize,
    /// Issued at (Unix timestamp).
    pub iat: usize,
    /// Token id.
    pub jti: String,
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("token is expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
    #[error("token encoding failed: {0}")]
    EncodingFailed(String),
}

/// Issues and verifies HS256 tokens with a shared secret.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl JwtService {
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }

    pub fn issue(&self, user_id: Id, email: &str, role: UserRole) -> Result<String, JwtError> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as usize;

        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now as i64 + self.ttl_secs).max(0) as usize,
            iat: now,
            jti: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            role,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid,
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_then_verify_returns_the_same_subject() {
        let service = JwtService::new(b"test-secret", 3600);
        let token = service.issue(42, "ops@example.com", UserRole::Admin).unwrap();

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "ops@example.com");
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[test]
    fn garbled_token_is_invalid() {
        let service = JwtService::new(b"test-secret", 3600);
        assert!(matches!(service.verify("not.a.jwt"), Err(JwtError::Invalid)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuing = JwtService::new(b"secret-a", 3600);
        let verifying = JwtService::new(b"secret-b", 3600);

        let token = issuing.issue(1, "a@example.com", UserRole::Staff).unwrap();
        assert!(verifying.verify(&token).is_err());
    }

    #[test]
    fn expired_token_reports_expired() {
        let service = JwtService::new(b"test-secret", -120);
        let token = service.issue(1, "a@example.com", UserRole::Staff).unwrap();
        assert!(matches!(service.verify(&token), Err(JwtError::Expired)));
    }
}
