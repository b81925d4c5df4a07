use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::input::ClientIdQuery;
use crate::models::profile::ProfileRow;
use crate::profile::store::require_profile;
use crate::state::AppState;
use crate::styling::recommend::{recommend, RecommendationResult};
use crate::styling::rules::palette_or_neutral;

/// The stored classification fields, echoed back as strings.
#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub body_shape: String,
    pub skin_tone: Option<String>,
    pub occasion: Option<String>,
    pub preferred_style: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub profile: ProfileSummary,
    pub palette_name: &'static str,
    pub recommendation: RecommendationResult,
}

fn build_response(profile: ProfileRow) -> RecommendationsResponse {
    let style = profile.style_profile();
    RecommendationsResponse {
        palette_name: palette_or_neutral(style.skin_tone).name,
        recommendation: recommend(&style),
        profile: ProfileSummary {
            body_shape: profile.body_shape,
            skin_tone: profile.skin_tone,
            occasion: profile.occasion,
            preferred_style: profile.preferred_style,
        },
    }
}

/// GET /api/v1/recommendations/:client_id
pub async fn handle_get_recommendations(
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let profile = require_profile(&state.db, client_id).await?;
    Ok(Json(build_response(profile)))
}

/// GET /api/v1/recommendations?client_id=
pub async fn handle_query_recommendations(
    State(state): State<AppState>,
    Query(query): Query<ClientIdQuery>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let client_id = query.require()?;
    let profile = require_profile(&state.db, client_id).await?;
    Ok(Json(build_response(profile)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::styling::rules::ContrastLevel;

    fn profile(skin_tone: Option<&str>, occasion: Option<&str>) -> ProfileRow {
        ProfileRow {
            client_id: 1,
            height_cm: None,
            shoulders_cm: 40.0,
            chest_cm: 90.0,
            waist_cm: 65.0,
            hip_cm: 92.0,
            skin_tone: skin_tone.map(str::to_string),
            occasion: occasion.map(str::to_string),
            preferred_style: Some("clásico".to_string()),
            body_shape: "reloj_arena".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_response_echoes_stored_fields() {
        let resp = build_response(profile(Some("oscuro"), Some("fiesta")));
        assert_eq!(resp.profile.body_shape, "reloj_arena");
        assert_eq!(resp.profile.skin_tone.as_deref(), Some("oscuro"));
        assert_eq!(resp.profile.preferred_style.as_deref(), Some("clásico"));
        assert_eq!(resp.recommendation.contrast_level, ContrastLevel::High);
        assert!(!resp.recommendation.occasion_tips.is_empty());
    }

    #[test]
    fn test_unknown_stored_codes_degrade_to_neutral() {
        let resp = build_response(profile(Some("morado"), None));
        assert_eq!(resp.palette_name, palette_or_neutral(None).name);
        assert_eq!(resp.recommendation.contrast_level, ContrastLevel::Medium);
        assert!(resp.recommendation.occasion_tips.is_empty());
        // The raw value is still echoed
        assert_eq!(resp.profile.skin_tone.as_deref(), Some("morado"));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(build_response(profile(Some("claro"), Some("casual")))).unwrap();
        assert!(json["profile"]["body_shape"].is_string());
        assert!(json["palette_name"].is_string());
        assert!(json["recommendation"]["palette_colors"][0]
            .as_str()
            .unwrap()
            .starts_with('#'));
        assert_eq!(json["recommendation"]["contrast_level"], "low");
    }
}
