use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::body_type::BodyTypeRow;
use crate::models::profile::{ClientPhotoRow, ProfileRow};
use crate::styling::body_shape::{BodyShape, Measurements, Occasion, SkinTone};

/// Everything the wizard writes to a profile. The body shape is not an input:
/// it is derived from `measurements` inside `upsert_profile`.
pub struct ProfileWrite {
    pub client_id: i64,
    pub height_cm: Option<f64>,
    pub measurements: Measurements,
    pub skin_tone: Option<SkinTone>,
    pub occasion: Option<Occasion>,
    pub preferred_style: Option<String>,
}

/// Inserts or replaces the client's single profile.
/// One statement keyed on `client_id`, so concurrent submissions resolve as last-write-wins.
pub async fn upsert_profile(pool: &PgPool, write: &ProfileWrite) -> Result<ProfileRow, sqlx::Error> {
    let body_shape: BodyShape = write.measurements.body_shape();

    sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO client_profiles
            (client_id, height_cm, shoulders_cm, chest_cm, waist_cm, hip_cm,
             skin_tone, occasion, preferred_style, body_shape)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (client_id) DO UPDATE SET
            height_cm = EXCLUDED.height_cm,
            shoulders_cm = EXCLUDED.shoulders_cm,
            chest_cm = EXCLUDED.chest_cm,
            waist_cm = EXCLUDED.waist_cm,
            hip_cm = EXCLUDED.hip_cm,
            skin_tone = EXCLUDED.skin_tone,
            occasion = EXCLUDED.occasion,
            preferred_style = EXCLUDED.preferred_style,
            body_shape = EXCLUDED.body_shape,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(write.client_id)
    .bind(write.height_cm)
    .bind(write.measurements.shoulders)
    .bind(write.measurements.chest)
    .bind(write.measurements.waist)
    .bind(write.measurements.hip)
    .bind(write.skin_tone.map(|t| t.as_str()))
    .bind(write.occasion.map(|o| o.as_str()))
    .bind(&write.preferred_style)
    .bind(body_shape.as_str())
    .fetch_one(pool)
    .await
}

pub async fn get_profile(pool: &PgPool, client_id: i64) -> Result<Option<ProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>("SELECT * FROM client_profiles WHERE client_id = $1")
        .bind(client_id)
        .fetch_optional(pool)
        .await
}

/// Loads a profile or fails with `NotFound`, as recommendation and catalog
/// requests need one.
pub async fn require_profile(pool: &PgPool, client_id: i64) -> Result<ProfileRow, AppError> {
    get_profile(pool, client_id).await?.ok_or_else(|| {
        AppError::NotFound(format!(
            "Client {client_id} has no profile yet; complete the survey first"
        ))
    })
}

pub async fn insert_photo(
    pool: &PgPool,
    client_id: i64,
    id: Uuid,
    s3_key: &str,
    mime_type: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO client_photos (id, client_id, s3_key, mime_type) VALUES ($1, $2, $3, $4)",
    )
    .bind(id)
    .bind(client_id)
    .bind(s3_key)
    .bind(mime_type)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn latest_photo(
    pool: &PgPool,
    client_id: i64,
) -> Result<Option<ClientPhotoRow>, sqlx::Error> {
    sqlx::query_as::<_, ClientPhotoRow>(
        "SELECT * FROM client_photos WHERE client_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(client_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_body_type(pool: &PgPool, code: &str) -> Result<Option<BodyTypeRow>, sqlx::Error> {
    sqlx::query_as::<_, BodyTypeRow>("SELECT * FROM body_types WHERE code = $1")
        .bind(code)
        .fetch_optional(pool)
        .await
}
