use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Display metadata for a body-shape code (name shown to clients, illustration).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BodyTypeRow {
    pub code: String,
    pub name: String,
    pub image_url: Option<String>,
}
