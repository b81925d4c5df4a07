use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::admin::auth::{key_matches, AdminKey};
use crate::admin::payload::{BodyTypePayload, GarmentPayload, TagPayload, TogglePayload};
use crate::admin::store::{self, GarmentDetail, TodayStats};
use crate::catalog::filter::CatalogGarment;
use crate::catalog::store::load_garments;
use crate::errors::AppError;
use crate::models::body_type::BodyTypeRow;
use crate::models::client::ClientActivityRow;
use crate::models::garment::TagRow;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

const OK: OkResponse = OkResponse { ok: true };

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub ok: bool,
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GarmentsResponse {
    pub garments: Vec<CatalogGarment>,
}

#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub tags: Vec<TagRow>,
}

#[derive(Debug, Serialize)]
pub struct BodyTypesResponse {
    pub body_types: Vec<BodyTypeRow>,
}

#[derive(Debug, Serialize)]
pub struct ClientsResponse {
    pub clients: Vec<ClientActivityRow>,
}

fn garment_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Garment {id} not found"))
}

/// POST /api/v1/admin/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<OkResponse>, AppError> {
    let key = req
        .key
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::Validation("key is required".to_string()))?;
    if !key_matches(&key, &state.config.admin_key) {
        return Err(AppError::Unauthorized);
    }
    Ok(Json(OK))
}

// ────────────────────────────────────────────────────────────────────────────
// Garments
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/admin/garments
/// Every garment including inactive ones, most recent first.
pub async fn handle_list_garments(
    _admin: AdminKey,
    State(state): State<AppState>,
) -> Result<Json<GarmentsResponse>, AppError> {
    let garments = load_garments(&state.db).await?;
    Ok(Json(GarmentsResponse { garments }))
}

/// GET /api/v1/admin/garments/:id
pub async fn handle_get_garment(
    _admin: AdminKey,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<GarmentDetail>, AppError> {
    let detail = store::get_garment_detail(&state.db, id)
        .await?
        .ok_or_else(|| garment_not_found(id))?;
    Ok(Json(detail))
}

/// POST /api/v1/admin/garments
pub async fn handle_create_garment(
    _admin: AdminKey,
    State(state): State<AppState>,
    Json(payload): Json<GarmentPayload>,
) -> Result<Json<CreatedResponse>, AppError> {
    let draft = payload.into_new_garment()?;
    let id = store::create_garment(&state.db, &draft).await?;
    info!("Created garment {id} ({})", draft.name);
    Ok(Json(CreatedResponse { ok: true, id }))
}

/// PUT /api/v1/admin/garments/:id
pub async fn handle_update_garment(
    _admin: AdminKey,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<GarmentPayload>,
) -> Result<Json<OkResponse>, AppError> {
    let draft = payload.into_draft()?;
    if !store::update_garment(&state.db, id, &draft).await? {
        return Err(garment_not_found(id));
    }
    info!(
        "Updated garment {id} (images replaced: {}, tags replaced: {})",
        !draft.images.is_empty(),
        draft.tags.is_some()
    );
    Ok(Json(OK))
}

/// PATCH /api/v1/admin/garments/:id/toggle
pub async fn handle_toggle_garment(
    _admin: AdminKey,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<TogglePayload>,
) -> Result<Json<OkResponse>, AppError> {
    let active = payload.validate()?;
    if !store::set_garment_active(&state.db, id, active).await? {
        return Err(garment_not_found(id));
    }
    info!("Garment {id} active = {active}");
    Ok(Json(OK))
}

/// DELETE /api/v1/admin/garments/:id
pub async fn handle_delete_garment(
    _admin: AdminKey,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OkResponse>, AppError> {
    if !store::delete_garment(&state.db, id).await? {
        return Err(garment_not_found(id));
    }
    info!("Deleted garment {id}");
    Ok(Json(OK))
}

/// DELETE /api/v1/admin/garments/:id/images/:image_id
pub async fn handle_delete_garment_image(
    _admin: AdminKey,
    State(state): State<AppState>,
    Path((id, image_id)): Path<(i64, i64)>,
) -> Result<Json<OkResponse>, AppError> {
    if !store::delete_garment_image(&state.db, id, image_id).await? {
        return Err(AppError::NotFound(format!(
            "Image {image_id} not found on garment {id}"
        )));
    }
    Ok(Json(OK))
}

// ────────────────────────────────────────────────────────────────────────────
// Tags
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/admin/tags
pub async fn handle_list_tags(
    _admin: AdminKey,
    State(state): State<AppState>,
) -> Result<Json<TagsResponse>, AppError> {
    let tags = store::list_tags(&state.db).await?;
    Ok(Json(TagsResponse { tags }))
}

/// POST /api/v1/admin/tags
pub async fn handle_upsert_tag(
    _admin: AdminKey,
    State(state): State<AppState>,
    Json(payload): Json<TagPayload>,
) -> Result<Json<TagRow>, AppError> {
    let (name, category) = payload.validate()?;
    let tag = store::upsert_tag(&state.db, &name, &category).await?;
    info!("Saved tag {} '{}' ({})", tag.id, tag.name, tag.category);
    Ok(Json(tag))
}

/// DELETE /api/v1/admin/tags/:id
pub async fn handle_delete_tag(
    _admin: AdminKey,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OkResponse>, AppError> {
    if !store::delete_tag(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Tag {id} not found")));
    }
    Ok(Json(OK))
}

// ────────────────────────────────────────────────────────────────────────────
// Body types, clients, stats
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/admin/body-types
pub async fn handle_list_body_types(
    _admin: AdminKey,
    State(state): State<AppState>,
) -> Result<Json<BodyTypesResponse>, AppError> {
    let body_types = store::list_body_types(&state.db).await?;
    Ok(Json(BodyTypesResponse { body_types }))
}

/// POST /api/v1/admin/body-types
pub async fn handle_upsert_body_type(
    _admin: AdminKey,
    State(state): State<AppState>,
    Json(payload): Json<BodyTypePayload>,
) -> Result<Json<BodyTypeRow>, AppError> {
    let (code, name, image_url) = payload.validate()?;
    let row = store::upsert_body_type(&state.db, code, &name, &image_url).await?;
    info!("Saved body type {code}");
    Ok(Json(row))
}

/// GET /api/v1/admin/clients
pub async fn handle_list_clients(
    _admin: AdminKey,
    State(state): State<AppState>,
) -> Result<Json<ClientsResponse>, AppError> {
    let clients = store::list_clients(&state.db).await?;
    Ok(Json(ClientsResponse { clients }))
}

/// GET /api/v1/admin/stats/today
pub async fn handle_today_stats(
    _admin: AdminKey,
    State(state): State<AppState>,
) -> Result<Json<TodayStats>, AppError> {
    Ok(Json(store::today_stats(&state.db).await?))
}
