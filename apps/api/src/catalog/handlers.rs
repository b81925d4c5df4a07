use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::catalog::filter::{available_garments, filter_catalog, CatalogGarment};
use crate::catalog::store::load_garments;
use crate::errors::AppError;
use crate::input::ClientIdQuery;
use crate::models::profile::ProfileRow;
use crate::profile::store::require_profile;
use crate::state::AppState;
use crate::styling::body_shape::{BodyShape, Occasion};

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub body_shape: BodyShape,
    pub occasion: Occasion,
    pub garments: Vec<CatalogGarment>,
}

#[derive(Debug, Serialize)]
pub struct CatalogAllResponse {
    pub garments: Vec<CatalogGarment>,
}

/// The two codes the catalog filter needs, read from a stored profile.
fn filter_codes(profile: &ProfileRow) -> Result<(BodyShape, Occasion), AppError> {
    let body_shape = BodyShape::parse_lenient(&profile.body_shape).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "stored body shape '{}' for client {} is not a known code",
            profile.body_shape,
            profile.client_id
        ))
    })?;
    let occasion = profile
        .occasion
        .as_deref()
        .and_then(Occasion::parse_lenient)
        .ok_or_else(|| {
            AppError::Validation(
                "The profile has no occasion; update the survey to browse the catalog".to_string(),
            )
        })?;
    Ok((body_shape, occasion))
}

/// GET /api/v1/catalog?client_id=
/// Garments tagged with the client's body shape and occasion.
pub async fn handle_get_catalog(
    State(state): State<AppState>,
    Query(query): Query<ClientIdQuery>,
) -> Result<Json<CatalogResponse>, AppError> {
    let client_id = query.require()?;

    let profile = require_profile(&state.db, client_id).await?;
    let (body_shape, occasion) = filter_codes(&profile)?;

    let all = load_garments(&state.db).await?;
    let garments = filter_catalog(&all, body_shape, occasion);
    debug!(
        "Catalog for client {client_id} ({body_shape}, {occasion}): {} of {} garments",
        garments.len(),
        all.len()
    );

    Ok(Json(CatalogResponse {
        body_shape,
        occasion,
        garments,
    }))
}

/// GET /api/v1/catalog/all
pub async fn handle_get_catalog_all(
    State(state): State<AppState>,
) -> Result<Json<CatalogAllResponse>, AppError> {
    let all = load_garments(&state.db).await?;
    Ok(Json(CatalogAllResponse {
        garments: available_garments(&all),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn profile(body_shape: &str, occasion: Option<&str>) -> ProfileRow {
        ProfileRow {
            client_id: 5,
            height_cm: Some(170.0),
            shoulders_cm: 44.0,
            chest_cm: 95.0,
            waist_cm: 80.0,
            hip_cm: 88.0,
            skin_tone: None,
            occasion: occasion.map(str::to_string),
            preferred_style: None,
            body_shape: body_shape.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_filter_codes_from_profile() {
        let (shape, occasion) = filter_codes(&profile("triangulo_invertido", Some("Cita"))).unwrap();
        assert_eq!(shape, BodyShape::TrianguloInvertido);
        assert_eq!(occasion, Occasion::Cita);
    }

    #[test]
    fn test_missing_or_unknown_occasion_is_a_client_error() {
        assert!(matches!(
            filter_codes(&profile("pera", None)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            filter_codes(&profile("pera", Some("boda"))),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_corrupt_body_shape_is_an_internal_error() {
        assert!(matches!(
            filter_codes(&profile("ovalo", Some("casual"))),
            Err(AppError::Internal(_))
        ));
    }
}
