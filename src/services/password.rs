//! bcrypt hashing helpers.
//!
//! Hashing runs on the blocking pool; at production cost a single hash takes
//! long enough to stall an async worker thread.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error(transparent)]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("password hashing task was cancelled")]
    TaskFailed,
}

pub async fn hash(password: String, cost: u32) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|_| PasswordError::TaskFailed)?
        .map_err(PasswordError::from)
}

pub async fn verify(password: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|_| PasswordError::TaskFailed)?
        .map_err(PasswordError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COST: u32 = 4;

    #[tokio::test]
    async fn hash_then_verify() {
        let hashed = hash("s3nha-segura".to_string(), COST).await.unwrap();
        assert!(hashed.starts_with("$2"));
        assert!(verify("s3nha-segura".to_string(), hashed).await.unwrap());
    }

    #[tokio::test]
    async fn wrong_password_does_not_verify() {
        let hashed = hash("s3nha-segura".to_string(), COST).await.unwrap();
        assert!(!verify("outra-senha".to_string(), hashed).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        assert!(verify("anything".to_string(), "not-a-hash".to_string())
            .await
            .is_err());
    }
}
