use axum::{
    extract::Path,
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use uuid::Uuid;

use crate::database::models::{Apostila, ApostilaSummary, EditedHtml};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::apostila_service::{
    ApostilaService, CreateApostilaInput, RenderPdfInput, UpdateHtmlInput,
};

const PDF_FILENAME: &str = "apostila.pdf";

/// POST /v1/apostilas - register a new document under the caller
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(input): Json<CreateApostilaInput>,
) -> ApiResult<Apostila> {
    let service = ApostilaService::new().await?;
    let apostila = service.create(user.user_id, input).await?;
    Ok(ApiResponse::created(apostila))
}

/// GET /v1/apostilas - list the caller's documents
pub async fn list(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<ApostilaSummary>> {
    let service = ApostilaService::new().await?;
    let apostilas = service.list(user.user_id).await?;
    Ok(ApiResponse::success(apostilas))
}

/// GET /v1/apostilas/:id - fetch one document; public so apostilas can be
/// shared by link
pub async fn show(Path(id): Path<Uuid>) -> ApiResult<Apostila> {
    let service = ApostilaService::new().await?;
    let apostila = service.get(id).await?;
    Ok(ApiResponse::success(apostila))
}

/// GET /v1/apostilas/:id/html - saved content of an owned document
pub async fn html_show(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<EditedHtml> {
    let service = ApostilaService::new().await?;
    let html = service.edited_html(user.user_id, id).await?;
    Ok(ApiResponse::success(html))
}

/// PUT /v1/apostilas/:id/html - replace the saved content
pub async fn html_update(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateHtmlInput>,
) -> ApiResult<()> {
    let service = ApostilaService::new().await?;
    service.update_edited_html(user.user_id, id, input).await?;
    Ok(ApiResponse::<()>::no_content())
}

/// DELETE /v1/apostilas/:id - remove an owned document
pub async fn delete(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let service = ApostilaService::new().await?;
    service.delete(user.user_id, id).await?;
    Ok(ApiResponse::<()>::no_content())
}

/// POST /v1/render - render caller-supplied HTML to PDF
pub async fn render(
    Extension(_user): Extension<AuthUser>,
    Json(input): Json<RenderPdfInput>,
) -> Result<Response, ApiError> {
    let service = ApostilaService::new().await?;
    let pdf = service.render_pdf(input).await?;
    Ok(pdf_response(pdf))
}

/// GET /v1/apostilas/:id/pdf - export the saved content of an owned document
pub async fn pdf_export(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let service = ApostilaService::new().await?;
    let pdf = service.render_stored_pdf(user.user_id, id).await?;
    Ok(pdf_response(pdf))
}

fn pdf_response(bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", PDF_FILENAME),
            ),
        ],
        bytes,
    )
        .into_response()
}
