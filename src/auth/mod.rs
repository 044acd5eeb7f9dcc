pub mod ownership;

pub use ownership::{ensure_owner, Owned};

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Claims that expire after the configured `jwt_expiry_hours`
    pub fn new(user_id: Uuid, email: impl Into<String>) -> Result<Self, AuthError> {
        Self::expiring_in(user_id, email, config::config().security.jwt_expiry_hours)
    }

    pub fn expiring_in(user_id: Uuid, email: impl Into<String>, hours: u64) -> Result<Self, AuthError> {
        let now = Utc::now();
        let exp = i64::try_from(hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| AuthError::TokenGeneration(format!("token lifetime of {} hours is out of range", hours)))?;

        Ok(Self {
            sub: user_id,
            email: email.into(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

fn secret() -> Result<&'static str, AuthError> {
    let secret = config::config().security.jwt_secret.as_str();
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }
    Ok(secret)
}

pub fn generate_jwt(claims: &Claims) -> Result<String, AuthError> {
    let encoding_key = EncodingKey::from_secret(secret()?.as_bytes());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Checks signature and expiry
pub fn validate_jwt(token: &str) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret()?.as_bytes());

    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

/// bcrypt is CPU-bound, so hashing runs on the blocking pool
pub async fn hash_password(password: String) -> Result<String, AuthError> {
    let cost = config::config().security.bcrypt_cost;
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = generate_jwt(&Claims::new(user_id, "ada@example.com").unwrap()).unwrap();
        let claims = validate_jwt(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "ada@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn rejects_tampered_and_expired_tokens() {
        let token = generate_jwt(&Claims::new(Uuid::new_v4(), "a@b.co").unwrap()).unwrap();
        let tampered = format!("{}x", token);
        assert!(matches!(validate_jwt(&tampered), Err(AuthError::InvalidToken(_))));

        let mut claims = Claims::new(Uuid::new_v4(), "a@b.co").unwrap();
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;
        let expired = generate_jwt(&claims).unwrap();
        assert!(validate_jwt(&expired).is_err());

        assert!(validate_jwt("not-a-jwt").is_err());
    }

    #[test]
    fn out_of_range_lifetime_is_an_error() {
        let err = Claims::expiring_in(Uuid::new_v4(), "a@b.co", u64::MAX).unwrap_err();
        assert!(matches!(err, AuthError::TokenGeneration(_)));
        assert!(Claims::expiring_in(Uuid::new_v4(), "a@b.co", i64::MAX as u64).is_err());

        let claims = Claims::expiring_in(Uuid::new_v4(), "a@b.co", 2).unwrap();
        assert_eq!(claims.exp - claims.iat, 7200);
    }

    #[tokio::test]
    async fn password_hash_verifies() {
        let hash = hash_password("secret1".to_string()).await.unwrap();
        assert_ne!(hash, "secret1");
        assert!(verify_password("secret1".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("secret2".to_string(), hash).await.unwrap());
    }
}
