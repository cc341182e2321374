use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use crate::database::models::User;
use crate::database::{self, DatabaseError};
use crate::services::auth_service::validate_password;
use crate::services::password::{self, PasswordError};

#[derive(Debug, Deserialize)]
pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,

    #[error("current password is incorrect")]
    IncorrectPassword,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub async fn new() -> Result<Self, UserError> {
        Ok(Self {
            pool: database::pool().await?.clone(),
        })
    }

    pub async fn get_user(&self, user_id: i64) -> Result<User, UserError> {
        let user: Option<User> = sqlx::query_as(
            "SELECT id, name, email, password, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or(UserError::NotFound)
    }

    pub async fn change_password(
        &self,
        user_id: i64,
        input: ChangePasswordInput,
    ) -> Result<(), UserError> {
        validate_password(&input.new_password).map_err(UserError::Validation)?;

        let user = self.get_user(user_id).await?;

        if !password::verify(input.current_password, user.password).await? {
            return Err(UserError::IncorrectPassword);
        }

        let cost = crate::config::config().security.bcrypt_cost;
        let hashed = password::hash(input.new_password, cost).await?;

        sqlx::query("UPDATE users SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(&hashed)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Removes the account and everything it owns in one transaction.
    pub async fn delete_account(&self, user_id: i64) -> Result<(), UserError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM apostilas WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(UserError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }
}
