// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 502 Bad Gateway (external process / renderer issues)
    BadGateway(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::BadGateway(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::BadGateway(_) => "BAD_GATEWAY",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code(),
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        ApiError::BadGateway(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert other error types to ApiError
impl From<crate::database::DatabaseError> for ApiError {
    fn from(err: crate::database::DatabaseError) -> Self {
        use crate::database::DatabaseError;

        match err {
            DatabaseError::ConfigMissing(what) => {
                tracing::error!("missing configuration: {}", what);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::Migration { version, source } => {
                tracing::error!("migration {} failed: {}", version, source);
                ApiError::service_unavailable("Service is being updated, please try again later")
            }
            DatabaseError::Sqlx(sqlx_err) => sqlx_error_to_api(sqlx_err),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        sqlx_error_to_api(err)
    }
}

fn sqlx_error_to_api(err: sqlx::Error) -> ApiError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
            tracing::error!("database unreachable: {}", err);
            ApiError::service_unavailable("Database temporarily unavailable")
        }
        other => {
            // Don't expose internal SQL errors to clients
            tracing::error!("database error: {}", other);
            ApiError::internal_server_error("An error occurred while processing your request")
        }
    }
}

impl From<crate::auth::JwtError> for ApiError {
    fn from(err: crate::auth::JwtError) -> Self {
        use crate::auth::JwtError;

        match err {
            JwtError::MissingSecret | JwtError::Sign(_) => {
                tracing::error!("token generation failed: {}", err);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            JwtError::Invalid(_) => ApiError::unauthorized("invalid token"),
        }
    }
}

impl From<crate::pdf::PdfError> for ApiError {
    fn from(err: crate::pdf::PdfError) -> Self {
        use crate::pdf::PdfError;

        match err {
            PdfError::EmptyBody => {
                ApiError::bad_request("the HTML did not render any visible content")
            }
            other => {
                tracing::error!("PDF rendering failed: {}", other);
                ApiError::bad_gateway("PDF rendering failed")
            }
        }
    }
}

impl From<crate::services::auth_service::AuthError> for ApiError {
    fn from(err: crate::services::auth_service::AuthError) -> Self {
        use crate::services::auth_service::AuthError;

        match err {
            AuthError::Validation(msg) => ApiError::bad_request(msg),
            AuthError::InvalidCredentials => ApiError::unauthorized("invalid credentials"),
            AuthError::EmailTaken => ApiError::conflict("email already registered"),
            AuthError::Password(e) => {
                tracing::error!("password hashing failed: {}", e);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            AuthError::Jwt(e) => e.into(),
            AuthError::Database(e) => e.into(),
            AuthError::Sqlx(e) => e.into(),
        }
    }
}

impl From<crate::services::user_service::UserError> for ApiError {
    fn from(err: crate::services::user_service::UserError) -> Self {
        use crate::services::user_service::UserError;

        match err {
            UserError::NotFound => ApiError::not_found("user not found"),
            UserError::IncorrectPassword => ApiError::bad_request("current password is incorrect"),
            UserError::Validation(msg) => ApiError::bad_request(msg),
            UserError::Password(e) => {
                tracing::error!("password hashing failed: {}", e);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            UserError::Database(e) => e.into(),
            UserError::Sqlx(e) => e.into(),
        }
    }
}

impl From<crate::services::apostila_service::ApostilaError> for ApiError {
    fn from(err: crate::services::apostila_service::ApostilaError) -> Self {
        use crate::services::apostila_service::ApostilaError;

        match err {
            ApostilaError::NotFound => ApiError::not_found("apostila not found"),
            ApostilaError::AlreadyExists => ApiError::conflict("apostila already exists"),
            ApostilaError::NoContent => {
                ApiError::bad_request("apostila has no saved content to export")
            }
            ApostilaError::Pdf(e) => e.into(),
            ApostilaError::Database(e) => e.into(),
            ApostilaError::Sqlx(e) => e.into(),
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_variants() {
        assert_eq!(ApiError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::bad_gateway("x").status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn json_body_shape() {
        let body = ApiError::not_found("apostila not found").to_json();
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "apostila not found");
        assert_eq!(body["code"], "NOT_FOUND");
    }
}
