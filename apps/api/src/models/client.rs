use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClientRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age_range: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Admin listing row with activity counters.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClientActivityRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age_range: Option<String>,
    pub created_at: DateTime<Utc>,
    pub photos: i64,
    pub try_ons: i64,
}
