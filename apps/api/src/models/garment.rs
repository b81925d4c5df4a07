use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::catalog::filter::{CatalogGarment, GarmentImages};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GarmentRow {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub color: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// A garment joined with its tags and first active image of each kind.
#[derive(Debug, Clone, FromRow)]
pub struct GarmentListingRow {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub color: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub active: bool,
    pub tags: Vec<String>,
    pub front_image: Option<String>,
    pub back_image: Option<String>,
    pub overlay_image: Option<String>,
}

impl From<GarmentListingRow> for CatalogGarment {
    fn from(row: GarmentListingRow) -> Self {
        CatalogGarment {
            id: row.id,
            name: row.name,
            category: row.category,
            color: row.color,
            price: row.price,
            stock: row.stock,
            active: row.active,
            tags: CatalogGarment::normalize_tags(row.tags),
            images: GarmentImages {
                front: row.front_image,
                back: row.back_image,
                overlay: row.overlay_image,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GarmentImageRow {
    pub id: i64,
    pub garment_id: i64,
    pub kind: String,
    pub url: String,
    pub position: i32,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TagRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}
