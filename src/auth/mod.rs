use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

/// Leeway applied to expiry checks so marginally-skewed clocks do not
/// reject freshly issued tokens.
const VALIDATION_LEEWAY_SECS: u64 = 5;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Signed token handed back to clients after register/login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret is not configured")]
    MissingSecret,
    #[error("failed to sign token: {0}")]
    Sign(jsonwebtoken::errors::Error),
    #[error("invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

/// Issue a token for a user using the configured secret and expiry.
pub fn issue_token(user_id: i64) -> Result<Token, JwtError> {
    let security = &config::config().security;
    issue_token_with(
        user_id,
        &security.jwt_secret,
        Duration::minutes(security.token_expiry_minutes),
    )
}

pub(crate) fn issue_token_with(user_id: i64, secret: &str, ttl: Duration) -> Result<Token, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }

    let claims = Claims::new(user_id, ttl);
    let access_token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(JwtError::Sign)?;

    Ok(Token {
        access_token,
        expires_at: Utc.timestamp_opt(claims.exp, 0).single().unwrap_or_else(Utc::now),
        issued_at: Utc.timestamp_opt(claims.iat, 0).single().unwrap_or_else(Utc::now),
    })
}

/// Validate a token and return its claims.
pub fn decode_token(token: &str) -> Result<Claims, JwtError> {
    decode_token_with(token, &config::config().security.jwt_secret)
}

pub(crate) fn decode_token_with(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }

    let mut validation = Validation::default();
    validation.leeway = VALIDATION_LEEWAY_SECS;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(JwtError::Invalid)?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issued_token_round_trips() {
        let token = issue_token_with(42, SECRET, Duration::minutes(60)).unwrap();
        let claims = decode_token_with(&token.access_token, SECRET).unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.exp, token.expires_at.timestamp());
        assert!(claims.iat <= claims.exp);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token_with(42, SECRET, Duration::minutes(60)).unwrap();
        let err = decode_token_with(&token.access_token, "other-secret").unwrap_err();
        assert!(matches!(err, JwtError::Invalid(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        // Expired well past the 5s leeway
        let token = issue_token_with(42, SECRET, Duration::minutes(-10)).unwrap();
        let err = decode_token_with(&token.access_token, SECRET).unwrap_err();
        assert!(matches!(err, JwtError::Invalid(_)));
    }

    #[test]
    fn empty_secret_fails_closed() {
        assert!(matches!(
            issue_token_with(1, "", Duration::minutes(60)),
            Err(JwtError::MissingSecret)
        ));
        assert!(matches!(
            decode_token_with("whatever", ""),
            Err(JwtError::MissingSecret)
        ));
    }
}
