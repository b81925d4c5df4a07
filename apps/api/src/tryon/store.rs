use sqlx::PgPool;
use uuid::Uuid;

use crate::models::tryon::TryOnResultRow;

/// How a try-on image was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryOnSource {
    Overlay,
    Ai,
}

impl TryOnSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TryOnSource::Overlay => "overlay",
            TryOnSource::Ai => "ai",
        }
    }
}

pub async fn insert_result(
    pool: &PgPool,
    id: Uuid,
    client_id: i64,
    garment_id: i64,
    s3_key: &str,
    source: TryOnSource,
) -> Result<TryOnResultRow, sqlx::Error> {
    sqlx::query_as::<_, TryOnResultRow>(
        r#"
        INSERT INTO tryon_results (id, client_id, garment_id, s3_key, source)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(client_id)
    .bind(garment_id)
    .bind(s3_key)
    .bind(source.as_str())
    .fetch_one(pool)
    .await
}
