//! Bearer-token authentication: HS256 JWTs carrying the user's id, email,
//! role and display name, plus the SHA-256 password digest helpers.
//!
//! Login verifies by re-hashing the presented password and comparing
//! digests; raw digests are never accepted as passwords.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use pantry::user::{User, UserRole};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::JwtConfig;
use crate::error::AppError;
use crate::state::State;

pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    BASE64.encode(digest)
}

pub fn verify_password(password: &str, stored_digest: &str) -> bool {
    hash_password(password) == stored_digest
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub role: String,
    pub name: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn role(&self) -> Result<UserRole, AppError> {
        UserRole::parse(&self.role).ok_or(AppError::Unauthorized)
    }
}

/// Signs a token for `user`, returning it with its expiry instant.
pub fn issue_token(user: &User, config: &JwtConfig) -> Result<(String, DateTime<Utc>), AppError> {
    let issued_at = Utc::now();
    let expires_at = issued_at + Duration::minutes(config.token_minutes);

    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        name: user.display_name(),
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("token signing: {e}")))?;

    Ok((token, expires_at))
}

pub fn decode_token(token: &str, config: &JwtConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);
    validation.set_audience(&[&config.audience]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized)
}

/// Extractor for routes behind authentication. Rejects with 401 when the
/// bearer token is missing, malformed, expired or mis-signed.
pub struct AuthUser {
    pub claims: Claims,
}

impl AuthUser {
    pub fn user_id(&self) -> &str {
        &self.claims.sub
    }

    pub fn role(&self) -> Result<UserRole, AppError> {
        self.claims.role()
    }
}

#[async_trait]
impl FromRequestParts<Arc<State>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<State>) -> Result<Self, AppError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = header.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;
        let claims = decode_token(token, &state.config.jwt)?;

        Ok(AuthUser { claims })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-that-is-long-enough".into(),
            issuer: "pantry".into(),
            audience: "pantry-clients".into(),
            token_minutes: 60,
            refresh_days: 7,
        }
    }

    fn sample_user() -> User {
        User::new(
            "Asha",
            "Rao",
            "asha@example.com",
            "999",
            hash_password("s3cret"),
            UserRole::Vendor,
        )
    }

    #[test]
    fn password_round_trip() {
        let digest = hash_password("s3cret");
        assert!(verify_password("s3cret", &digest));
        assert!(!verify_password("S3cret", &digest));
        // The stored digest itself must not pass as a password.
        assert!(!verify_password(&digest, &digest));
    }

    #[test]
    fn token_round_trip_preserves_identity() {
        let config = jwt_config();
        let user = sample_user();
        let (token, expires_at) = issue_token(&user, &config).unwrap();
        assert!(expires_at > Utc::now());

        let claims = decode_token(&token, &config).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "asha@example.com");
        assert_eq!(claims.role().unwrap(), UserRole::Vendor);
        assert_eq!(claims.name, "Asha Rao");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = jwt_config();
        let (token, _) = issue_token(&sample_user(), &config).unwrap();

        let mut other = jwt_config();
        other.secret = "a-different-secret-entirely!!".into();
        assert!(decode_token(&token, &other).is_err());
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let config = jwt_config();
        let (token, _) = issue_token(&sample_user(), &config).unwrap();

        let mut other = jwt_config();
        other.audience = "someone-else".into();
        assert!(decode_token(&token, &other).is_err());
    }
}
