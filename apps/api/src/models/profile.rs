use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::styling::recommend::StyleProfile;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub client_id: i64,
    pub height_cm: Option<f64>,
    pub shoulders_cm: f64,
    pub chest_cm: f64,
    pub waist_cm: f64,
    pub hip_cm: f64,
    pub skin_tone: Option<String>,
    pub occasion: Option<String>,
    pub preferred_style: Option<String>,
    pub body_shape: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRow {
    pub fn style_profile(&self) -> StyleProfile {
        StyleProfile::from_stored(
            &self.body_shape,
            self.skin_tone.as_deref(),
            self.occasion.as_deref(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClientPhotoRow {
    pub id: Uuid,
    pub client_id: i64,
    pub s3_key: String,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}
