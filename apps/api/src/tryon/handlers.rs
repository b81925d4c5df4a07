use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::catalog::filter::CatalogGarment;
use crate::catalog::store::load_garment;
use crate::clients::store::client_exists;
use crate::errors::AppError;
use crate::input::require_id;
use crate::media::store::{get_image, object_key, put_image, ImageFolder};
use crate::media::InlineImage;
use crate::profile::store::latest_photo;
use crate::state::AppState;
use crate::tryon::guard::{within_ttl, GenerationLock};
use crate::tryon::overlay::resolve_overlay;
use crate::tryon::store::{insert_result, TryOnSource};

#[derive(Debug, Deserialize)]
pub struct TryOnQuery {
    pub client_id: Option<i64>,
    pub garment_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TryOnContextResponse {
    /// Latest client photo as a data URL.
    pub photo: String,
    pub garment: CatalogGarment,
}

#[derive(Debug, Deserialize)]
pub struct SaveTryOnRequest {
    pub client_id: Option<i64>,
    pub garment_id: Option<i64>,
    pub result_image_base64: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveTryOnResponse {
    pub ok: bool,
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AiTryOnRequest {
    pub client_id: Option<i64>,
    pub garment_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AiTryOnResponse {
    pub ok: bool,
    /// Generated image as a data URL.
    pub result_image_base64: String,
}

fn require_pair(client_id: Option<i64>, garment_id: Option<i64>) -> Result<(i64, i64), AppError> {
    match (client_id, garment_id) {
        (Some(c), Some(g)) => Ok((require_id("client_id", c)?, require_id("garment_id", g)?)),
        _ => Err(AppError::Validation(
            "client_id and garment_id are required".to_string(),
        )),
    }
}

async fn load_latest_photo(state: &AppState, client_id: i64) -> Result<InlineImage, AppError> {
    let photo = latest_photo(&state.db, client_id).await?.ok_or_else(|| {
        AppError::NotFound(format!(
            "Client {client_id} has no photo; complete the survey first"
        ))
    })?;
    Ok(get_image(&state.s3, &state.config.s3_bucket, &photo.s3_key, &photo.mime_type).await?)
}

async fn load_active_garment(state: &AppState, garment_id: i64) -> Result<CatalogGarment, AppError> {
    load_garment(&state.db, garment_id)
        .await?
        .filter(|g| g.active)
        .ok_or_else(|| AppError::NotFound(format!("Garment {garment_id} not found or inactive")))
}

/// Uploads a try-on image and records it.
async fn store_result(
    state: &AppState,
    client_id: i64,
    garment_id: i64,
    image: &InlineImage,
    source: TryOnSource,
) -> Result<Uuid, AppError> {
    let id = Uuid::new_v4();
    let key = object_key(ImageFolder::TryOns, client_id, id, image);
    put_image(&state.s3, &state.config.s3_bucket, &key, image).await?;
    insert_result(&state.db, id, client_id, garment_id, &key, source).await?;
    Ok(id)
}

/// GET /api/v1/tryon/context?client_id=&garment_id=
pub async fn handle_tryon_context(
    State(state): State<AppState>,
    Query(query): Query<TryOnQuery>,
) -> Result<Json<TryOnContextResponse>, AppError> {
    let (client_id, garment_id) = require_pair(query.client_id, query.garment_id)?;

    let photo = load_latest_photo(&state, client_id).await?;
    let garment = load_active_garment(&state, garment_id).await?;

    Ok(Json(TryOnContextResponse {
        photo: photo.to_data_url(),
        garment,
    }))
}

/// POST /api/v1/tryon/save
/// Persists a composite produced in the browser (2D overlay mode).
pub async fn handle_save_tryon(
    State(state): State<AppState>,
    Json(req): Json<SaveTryOnRequest>,
) -> Result<Json<SaveTryOnResponse>, AppError> {
    let image = req
        .result_image_base64
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            AppError::Validation(
                "client_id, garment_id and result_image_base64 are required".to_string(),
            )
        })?;
    let (client_id, garment_id) = require_pair(req.client_id, req.garment_id)?;
    let image = InlineImage::parse(&image)?;

    if !client_exists(&state.db, client_id).await? {
        return Err(AppError::NotFound(format!("Client {client_id} not found")));
    }
    if load_garment(&state.db, garment_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Garment {garment_id} not found")));
    }

    let id = store_result(&state, client_id, garment_id, &image, TryOnSource::Overlay).await?;
    info!("Saved overlay try-on {id} for client {client_id}, garment {garment_id}");

    Ok(Json(SaveTryOnResponse { ok: true, id }))
}

/// POST /api/v1/tryon/ai
///
/// Dresses the client's latest photo with the garment's overlay image.
/// Only one generation per client and garment runs at a time.
pub async fn handle_ai_tryon(
    State(state): State<AppState>,
    Json(req): Json<AiTryOnRequest>,
) -> Result<Json<AiTryOnResponse>, AppError> {
    let (client_id, garment_id) = require_pair(req.client_id, req.garment_id)?;

    let lock = GenerationLock::acquire(
        &state.redis,
        client_id,
        garment_id,
        state.config.tryon_lock_ttl_secs,
    )
    .await?
    .ok_or_else(|| {
        AppError::Conflict(format!(
            "A try-on for client {client_id} and garment {garment_id} is already being generated"
        ))
    })?;

    let outcome = within_ttl(
        state.config.tryon_lock_ttl_secs,
        generate_and_store(&state, client_id, garment_id),
    )
    .await;
    lock.release().await;
    let image = outcome?;

    Ok(Json(AiTryOnResponse {
        ok: true,
        result_image_base64: image.to_data_url(),
    }))
}

async fn generate_and_store(
    state: &AppState,
    client_id: i64,
    garment_id: i64,
) -> Result<InlineImage, AppError> {
    let person = load_latest_photo(state, client_id).await?;
    let garment = load_active_garment(state, garment_id).await?;

    let overlay_ref = garment.images.overlay.as_deref().ok_or_else(|| {
        AppError::Validation(format!("Garment {garment_id} has no overlay image"))
    })?;
    let overlay = resolve_overlay(overlay_ref, &state.config.overlay_dir).await?;

    info!("Generating AI try-on for client {client_id}, garment {garment_id}");
    let result = state.generator.generate(&person, &overlay).await?;

    let id = store_result(state, client_id, garment_id, &result, TryOnSource::Ai).await?;
    info!("Stored AI try-on {id}");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_pair() {
        assert_eq!(require_pair(Some(1), Some(2)).unwrap(), (1, 2));
        assert!(matches!(
            require_pair(Some(1), None),
            Err(AppError::Validation(msg)) if msg.contains("garment_id")
        ));
        assert!(require_pair(None, Some(2)).is_err());
        assert!(require_pair(Some(0), Some(2)).is_err());
    }

    #[test]
    fn test_save_request_accepts_missing_fields_for_validation() {
        let req: SaveTryOnRequest = serde_json::from_str(r#"{"client_id": 3}"#).unwrap();
        assert_eq!(req.client_id, Some(3));
        assert!(req.garment_id.is_none());
        assert!(req.result_image_base64.is_none());
    }
}
