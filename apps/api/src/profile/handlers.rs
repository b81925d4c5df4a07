use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::clients::store::client_exists;
use crate::errors::AppError;
use crate::input::{clean_optional, parse_optional_code, require_field, require_id};
use crate::media::store::{get_image, object_key, put_image, ImageFolder};
use crate::media::InlineImage;
use crate::models::body_type::BodyTypeRow;
use crate::models::profile::ProfileRow;
use crate::profile::store::{
    get_body_type, get_profile, insert_photo, latest_photo, upsert_profile, ProfileWrite,
};
use crate::state::AppState;
use crate::styling::body_shape::{check_measurement, BodyShape, Measurements};

#[derive(Debug, Deserialize)]
pub struct WizardRequest {
    #[serde(default)]
    pub client_id: i64,
    pub height_cm: Option<f64>,
    pub shoulders_cm: Option<f64>,
    pub chest_cm: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hip_cm: Option<f64>,
    pub skin_tone: Option<String>,
    pub occasion: Option<String>,
    pub preferred_style: Option<String>,
    #[serde(default)]
    pub photo_base64: String,
}

#[derive(Debug, Serialize)]
pub struct WizardResponse {
    pub ok: bool,
    pub body_shape: BodyShape,
    pub body_shape_name: String,
    pub body_shape_image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: ProfileRow,
    /// Latest survey photo as a data URL.
    pub latest_photo: Option<String>,
    pub body_type: Option<BodyTypeRow>,
}

/// Validated wizard submission, ready to persist.
struct WizardSubmission {
    write: ProfileWrite,
    photo: InlineImage,
}

impl WizardRequest {
    fn validate(self) -> Result<WizardSubmission, AppError> {
        let client_id = require_id("client_id", self.client_id)?;
        let measurements = Measurements::new(
            require_field("shoulders_cm", self.shoulders_cm)?,
            require_field("chest_cm", self.chest_cm)?,
            require_field("waist_cm", self.waist_cm)?,
            require_field("hip_cm", self.hip_cm)?,
        )?;
        let height_cm = self
            .height_cm
            .map(|h| check_measurement("height_cm", h))
            .transpose()?;
        let skin_tone = parse_optional_code(self.skin_tone)?;
        let occasion = parse_optional_code(self.occasion)?;
        if self.photo_base64.trim().is_empty() {
            return Err(AppError::Validation("photo_base64 is required".to_string()));
        }
        let photo = InlineImage::parse(&self.photo_base64)?;

        Ok(WizardSubmission {
            write: ProfileWrite {
                client_id,
                height_cm,
                measurements,
                skin_tone,
                occasion,
                preferred_style: clean_optional(self.preferred_style),
            },
            photo,
        })
    }
}

/// POST /api/v1/profile/wizard
///
/// Stores the survey photo, classifies the silhouette and upserts the profile.
pub async fn handle_wizard(
    State(state): State<AppState>,
    Json(req): Json<WizardRequest>,
) -> Result<Json<WizardResponse>, AppError> {
    let WizardSubmission { write, photo } = req.validate()?;
    let client_id = write.client_id;

    if !client_exists(&state.db, client_id).await? {
        return Err(AppError::NotFound(format!("Client {client_id} not found")));
    }

    let photo_id = Uuid::new_v4();
    let key = object_key(ImageFolder::Photos, client_id, photo_id, &photo);
    put_image(&state.s3, &state.config.s3_bucket, &key, &photo).await?;
    insert_photo(&state.db, client_id, photo_id, &key, &photo.mime_type).await?;

    let profile = upsert_profile(&state.db, &write).await?;
    let body_shape = write.measurements.body_shape();
    info!("Profile saved for client {client_id}: body shape {body_shape}");

    let body_type = get_body_type(&state.db, &profile.body_shape).await?;
    let (body_shape_name, body_shape_image_url) = match body_type {
        Some(t) => (t.name, t.image_url),
        None => (body_shape.as_str().to_string(), None),
    };

    Ok(Json(WizardResponse {
        ok: true,
        body_shape,
        body_shape_name,
        body_shape_image_url,
    }))
}

/// GET /api/v1/profile/:client_id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = get_profile(&state.db, client_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Client {client_id} has no profile")))?;

    let latest_photo = match latest_photo(&state.db, client_id).await? {
        Some(row) => match get_image(&state.s3, &state.config.s3_bucket, &row.s3_key, &row.mime_type)
            .await
        {
            Ok(image) => Some(image.to_data_url()),
            Err(e) => {
                // The profile is still useful without its photo
                warn!("Could not load photo {} for client {client_id}: {e}", row.id);
                None
            }
        },
        None => None,
    };

    let body_type = get_body_type(&state.db, &profile.body_shape).await?;

    Ok(Json(ProfileResponse {
        profile,
        latest_photo,
        body_type,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styling::body_shape::{Occasion, SkinTone};

    const PIXEL: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

    fn request() -> WizardRequest {
        WizardRequest {
            client_id: 12,
            height_cm: Some(165.0),
            shoulders_cm: Some(40.0),
            chest_cm: Some(85.0),
            waist_cm: Some(70.0),
            hip_cm: Some(100.0),
            skin_tone: Some("Medio_Claro".to_string()),
            occasion: Some("oficina".to_string()),
            preferred_style: Some("  ".to_string()),
            photo_base64: format!("data:image/png;base64,{PIXEL}"),
        }
    }

    #[test]
    fn test_valid_request() {
        let submission = request().validate().unwrap();
        assert_eq!(submission.write.client_id, 12);
        assert_eq!(submission.write.measurements.body_shape(), BodyShape::Pera);
        assert_eq!(submission.write.skin_tone, Some(SkinTone::MedioClaro));
        assert_eq!(submission.write.occasion, Some(Occasion::Oficina));
        assert_eq!(submission.write.preferred_style, None);
        assert_eq!(submission.photo.mime_type, "image/png");
    }

    #[test]
    fn test_rejects_non_positive_measurement() {
        let mut req = request();
        req.waist_cm = Some(0.0);
        assert!(matches!(req.validate(), Err(AppError::Validation(msg)) if msg.contains("waist_cm")));
    }

    #[test]
    fn test_rejects_non_finite_height() {
        let mut req = request();
        req.height_cm = Some(f64::NAN);
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_height_is_optional() {
        let mut req = request();
        req.height_cm = None;
        assert!(req.validate().unwrap().write.height_cm.is_none());
    }

    #[test]
    fn test_rejects_unknown_codes() {
        let mut req = request();
        req.skin_tone = Some("verde".to_string());
        assert!(req.validate().is_err());

        let mut req = request();
        req.occasion = Some("boda".to_string());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_requires_photo() {
        let mut req = request();
        req.photo_base64 = String::new();
        assert!(matches!(req.validate(), Err(AppError::Validation(msg)) if msg.contains("photo")));

        let mut req = request();
        req.photo_base64 = "%%%".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_missing_fields_in_body_are_validation_errors() {
        let body = format!(
            r#"{{"client_id": 12, "shoulders_cm": 40, "chest_cm": 85, "waist_cm": 70, "photo_base64": "{PIXEL}"}}"#
        );
        let req: WizardRequest = serde_json::from_str(&body).unwrap();
        assert!(matches!(req.validate(), Err(AppError::Validation(msg)) if msg.contains("hip_cm")));

        let req: WizardRequest = serde_json::from_str(
            r#"{"client_id": 12, "shoulders_cm": 40, "chest_cm": 85, "waist_cm": 70, "hip_cm": 100}"#,
        )
        .unwrap();
        assert!(matches!(req.validate(), Err(AppError::Validation(msg)) if msg.contains("photo")));

        let req: WizardRequest = serde_json::from_str("{}").unwrap();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_requires_client_id() {
        let mut req = request();
        req.client_id = 0;
        assert!(req.validate().is_err());
    }
}
