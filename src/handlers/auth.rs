use axum::Json;

use crate::auth::Token;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::auth_service::{AuthService, LoginInput, RegisterInput};

/// POST /v1/auth/register - create an account and return its first token
pub async fn register(Json(input): Json<RegisterInput>) -> ApiResult<Token> {
    let service = AuthService::new().await?;
    let token = service.register(input).await?;
    Ok(ApiResponse::created(token))
}

/// POST /v1/auth/login - authenticate and receive a JWT
pub async fn login(Json(input): Json<LoginInput>) -> ApiResult<Token> {
    let service = AuthService::new().await?;
    let token = service.login(input).await?;
    Ok(ApiResponse::success(token))
}

/// POST /v1/auth/logout - stateless; clients drop the token
pub async fn logout() -> ApiResult<()> {
    let service = AuthService::new().await?;
    service.logout();
    Ok(ApiResponse::<()>::no_content())
}
