use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Apostila, ApostilaSummary, EditedHtml};
use crate::database::{self, DatabaseError};
use crate::pdf::{PdfError, PdfRenderer};

#[derive(Debug, Deserialize)]
pub struct CreateApostilaInput {
    /// Client-generated document id.
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UpdateHtmlInput {
    pub html: String,
}

#[derive(Debug, Deserialize)]
pub struct RenderPdfInput {
    pub html: String,
}

#[derive(Debug, Error)]
pub enum ApostilaError {
    #[error("apostila not found")]
    NotFound,

    #[error("apostila already exists")]
    AlreadyExists,

    #[error("apostila has no saved content to export")]
    NoContent,

    #[error(transparent)]
    Pdf(#[from] PdfError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub struct ApostilaService {
    pool: PgPool,
    renderer: PdfRenderer,
}

impl ApostilaService {
    pub async fn new() -> Result<Self, ApostilaError> {
        Ok(Self {
            pool: database::pool().await?.clone(),
            renderer: PdfRenderer::from_config(),
        })
    }

    pub async fn create(&self, user_id: i64, input: CreateApostilaInput) -> Result<Apostila, ApostilaError> {
        let apostila: Apostila = sqlx::query_as(
            "INSERT INTO apostilas (id, user_id) VALUES ($1, $2) \
             RETURNING id, user_id, edited_html, created_at, updated_at",
        )
        .bind(input.id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(insert_error)?;

        Ok(apostila)
    }

    pub async fn list(&self, user_id: i64) -> Result<Vec<ApostilaSummary>, ApostilaError> {
        let apostilas: Vec<ApostilaSummary> = sqlx::query_as(
            "SELECT id, user_id, created_at, updated_at \
             FROM apostilas WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(apostilas)
    }

    /// Unscoped fetch: published apostilas are shareable by link, so no
    /// ownership check here.
    pub async fn get(&self, id: Uuid) -> Result<Apostila, ApostilaError> {
        let apostila: Option<Apostila> = sqlx::query_as(
            "SELECT id, user_id, edited_html, created_at, updated_at \
             FROM apostilas WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        apostila.ok_or(ApostilaError::NotFound)
    }

    pub async fn edited_html(&self, user_id: i64, id: Uuid) -> Result<EditedHtml, ApostilaError> {
        let row: Option<Option<String>> =
            sqlx::query_scalar("SELECT edited_html FROM apostilas WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        // A row without saved content yields an empty document
        let html = row.ok_or(ApostilaError::NotFound)?.unwrap_or_default();
        Ok(EditedHtml { html })
    }

    pub async fn update_edited_html(
        &self,
        user_id: i64,
        id: Uuid,
        input: UpdateHtmlInput,
    ) -> Result<(), ApostilaError> {
        let updated = sqlx::query(
            "UPDATE apostilas SET edited_html = $1, updated_at = NOW() \
             WHERE id = $2 AND user_id = $3",
        )
        .bind(&input.html)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(ApostilaError::NotFound);
        }

        Ok(())
    }

    pub async fn delete(&self, user_id: i64, id: Uuid) -> Result<(), ApostilaError> {
        let deleted = sqlx::query("DELETE FROM apostilas WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(ApostilaError::NotFound);
        }

        Ok(())
    }

    /// Render caller-supplied HTML to PDF bytes.
    pub async fn render_pdf(&self, input: RenderPdfInput) -> Result<Vec<u8>, ApostilaError> {
        if input.html.trim().is_empty() {
            return Err(ApostilaError::NoContent);
        }

        Ok(self.renderer.render(&input.html).await?)
    }

    /// Render the saved content of an owned apostila and keep the bytes as
    /// the latest export.
    pub async fn render_stored_pdf(&self, user_id: i64, id: Uuid) -> Result<Vec<u8>, ApostilaError> {
        let saved = self.edited_html(user_id, id).await?;
        if saved.html.trim().is_empty() {
            return Err(ApostilaError::NoContent);
        }

        let pdf = self.renderer.render(&saved.html).await?;

        sqlx::query("UPDATE apostilas SET pdf_raw = $1 WHERE id = $2 AND user_id = $3")
            .bind(pdf.as_slice())
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(pdf)
    }
}

fn insert_error(err: sqlx::Error) -> ApostilaError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return ApostilaError::AlreadyExists;
        }
    }
    ApostilaError::Sqlx(err)
}
