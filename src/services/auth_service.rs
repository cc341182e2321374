use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use crate::auth::{self, Token};
use crate::config;
use crate::database::models::User;
use crate::database::{self, DatabaseError};
use crate::services::password::{self, PasswordError};

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email already registered")]
    EmailTaken,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Jwt(#[from] auth::JwtError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub async fn new() -> Result<Self, AuthError> {
        Ok(Self {
            pool: database::pool().await?.clone(),
        })
    }

    pub async fn register(&self, input: RegisterInput) -> Result<Token, AuthError> {
        validate_registration(&input)?;

        let hashed = password::hash(input.password, config::config().security.bcrypt_cost).await?;

        let user: User = sqlx::query_as(
            "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) \
             RETURNING id, name, email, password, created_at, updated_at",
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&hashed)
        .fetch_one(&self.pool)
        .await
        .map_err(insert_error)?;

        Ok(auth::issue_token(user.id)?)
    }

    pub async fn login(&self, input: LoginInput) -> Result<Token, AuthError> {
        if input.email.is_empty() || input.password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let user: Option<User> = sqlx::query_as(
            "SELECT id, name, email, password, created_at, updated_at \
             FROM users WHERE email = $1",
        )
        .bind(&input.email)
        .fetch_optional(&self.pool)
        .await?;

        // Unknown email and wrong password fail identically
        let user = user.ok_or(AuthError::InvalidCredentials)?;
        if !password::verify(input.password, user.password.clone()).await? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(auth::issue_token(user.id)?)
    }

    /// Tokens are not tracked server-side; expiry is the only revocation.
    pub fn logout(&self) {}
}

fn insert_error(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AuthError::EmailTaken;
        }
    }
    AuthError::Sqlx(err)
}

fn validate_registration(input: &RegisterInput) -> Result<(), AuthError> {
    if input.name.trim().is_empty() {
        return Err(AuthError::Validation("name is required".to_string()));
    }
    validate_email_format(&input.email).map_err(AuthError::Validation)?;
    validate_password(&input.password).map_err(AuthError::Validation)?;
    Ok(())
}

pub(crate) fn validate_email_format(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("email cannot be empty".to_string());
    }

    if !email.contains('@') || !email.contains('.') {
        return Err("invalid email format".to_string());
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err("invalid email format".to_string());
    }

    Ok(())
}

pub(crate) fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    Ok(())
}
