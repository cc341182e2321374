use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Apostila {
    pub id: Uuid,
    pub user_id: i64,
    pub edited_html: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row without the (potentially large) HTML body.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApostilaSummary {
    pub id: Uuid,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Saved HTML content of one apostila.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditedHtml {
    pub html: String,
}
