//! Admin request bodies and their validation into store-ready drafts.

use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::filter::CatalogGarment;
use crate::errors::AppError;
use crate::input::{clean_optional, require_field, require_text};
use crate::styling::body_shape::{BodyShape, Occasion};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    Front,
    Back,
    Overlay,
    Extra,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Front => "front",
            ImageKind::Back => "back",
            ImageKind::Overlay => "overlay",
            ImageKind::Extra => "extra",
        }
    }
}

impl FromStr for ImageKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, AppError> {
        match s.trim().to_lowercase().as_str() {
            "front" => Ok(ImageKind::Front),
            "back" => Ok(ImageKind::Back),
            "overlay" => Ok(ImageKind::Overlay),
            "extra" => Ok(ImageKind::Extra),
            other => Err(AppError::Validation(format!(
                "Unknown image kind '{other}'; expected front, back, overlay or extra"
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageInput {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub url: String,
    pub position: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub kind: ImageKind,
    pub url: String,
    pub position: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GarmentPayload {
    #[serde(default)]
    pub name: String,
    pub category: Option<String>,
    pub color: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub active: Option<bool>,
    #[serde(default)]
    pub images: Vec<ImageInput>,
    pub tags: Option<Vec<String>>,
}

/// A validated garment write.
#[derive(Debug, Clone)]
pub struct GarmentDraft {
    pub name: String,
    pub category: Option<String>,
    pub color: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub active: bool,
    /// Empty on update means "keep the current images".
    pub images: Vec<NewImage>,
    /// `None` on update means "keep the current tags".
    pub tags: Option<BTreeSet<String>>,
}

impl GarmentPayload {
    /// Creation additionally requires a front and an overlay image.
    pub fn into_new_garment(self) -> Result<GarmentDraft, AppError> {
        let draft = self.into_draft()?;
        for required in [ImageKind::Front, ImageKind::Overlay] {
            if !draft.images.iter().any(|img| img.kind == required) {
                return Err(AppError::Validation(format!(
                    "A {} image is required",
                    required.as_str()
                )));
            }
        }
        Ok(draft)
    }

    pub fn into_draft(self) -> Result<GarmentDraft, AppError> {
        let name = require_text("name", &self.name)?;

        let price = self.price.unwrap_or(Decimal::ZERO);
        if price < Decimal::ZERO {
            return Err(AppError::Validation("price must not be negative".to_string()));
        }
        let stock = self.stock.unwrap_or(0);
        if stock < 0 {
            return Err(AppError::Validation("stock must not be negative".to_string()));
        }

        Ok(GarmentDraft {
            name,
            category: clean_optional(self.category),
            color: clean_optional(self.color),
            price,
            stock,
            active: self.active.unwrap_or(true),
            images: parse_images(self.images)?,
            tags: self.tags.map(CatalogGarment::normalize_tags),
        })
    }
}

/// Entries with a blank kind or url are skipped.
fn parse_images(inputs: Vec<ImageInput>) -> Result<Vec<NewImage>, AppError> {
    inputs
        .into_iter()
        .filter(|img| !img.kind.trim().is_empty() && !img.url.trim().is_empty())
        .map(|img| {
            Ok(NewImage {
                kind: img.kind.parse()?,
                url: img.url.trim().to_string(),
                position: img.position.unwrap_or(1),
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct TogglePayload {
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct TagPayload {
    #[serde(default)]
    pub name: String,
    pub category: Option<String>,
}

impl TogglePayload {
    pub fn validate(self) -> Result<bool, AppError> {
        require_field("active", self.active)
    }
}

/// Tags named after a silhouette or an occasion drive the catalog filter.
pub fn infer_tag_category(name: &str) -> &'static str {
    if BodyShape::parse_lenient(name).is_some() {
        "body_shape"
    } else if Occasion::parse_lenient(name).is_some() {
        "occasion"
    } else {
        "general"
    }
}

impl TagPayload {
    /// Returns the trimmed name and the explicit or inferred category.
    pub fn validate(self) -> Result<(String, String), AppError> {
        let name = require_text("name", &self.name)?;
        let category = clean_optional(self.category)
            .map(|c| c.to_lowercase())
            .unwrap_or_else(|| infer_tag_category(&name).to_string());
        Ok((name, category))
    }
}

#[derive(Debug, Deserialize)]
pub struct BodyTypePayload {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image_url: String,
}

impl BodyTypePayload {
    pub fn validate(self) -> Result<(BodyShape, String, String), AppError> {
        let code: BodyShape = require_text("code", &self.code)?.to_lowercase().parse()?;
        let name = require_text("name", &self.name)?;
        let image_url = require_text("image_url", &self.image_url)?;
        Ok((code, name, image_url))
    }
}
