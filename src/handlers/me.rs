use axum::{Extension, Json};

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::user_service::{ChangePasswordInput, UserService};

/// GET /v1/me - profile of the authenticated user
pub async fn show(Extension(user): Extension<AuthUser>) -> ApiResult<User> {
    let service = UserService::new().await?;
    let profile = service.get_user(user.user_id).await?;
    Ok(ApiResponse::success(profile))
}

/// PATCH /v1/me/password - rotate the password after re-verification
pub async fn change_password(
    Extension(user): Extension<AuthUser>,
    Json(input): Json<ChangePasswordInput>,
) -> ApiResult<()> {
    let service = UserService::new().await?;
    service.change_password(user.user_id, input).await?;
    Ok(ApiResponse::<()>::no_content())
}

/// DELETE /v1/me - remove the account and its apostilas
pub async fn delete(Extension(user): Extension<AuthUser>) -> ApiResult<()> {
    let service = UserService::new().await?;
    service.delete_account(user.user_id).await?;
    Ok(ApiResponse::<()>::no_content())
}
