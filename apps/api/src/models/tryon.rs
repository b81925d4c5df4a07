use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TryOnResultRow {
    pub id: Uuid,
    pub client_id: i64,
    pub garment_id: i64,
    pub s3_key: String,
    /// "overlay" for client-side composites, "ai" for generated images.
    pub source: String,
    pub created_at: DateTime<Utc>,
}
