//! Catalog tag filter. Works on an already-loaded garment list.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::styling::body_shape::{BodyShape, Occasion};

/// Primary image references of a garment, first active image of each kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GarmentImages {
    pub front: Option<String>,
    pub back: Option<String>,
    pub overlay: Option<String>,
}

/// A garment as seen by the catalog: stock state, tags and primary images.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogGarment {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub color: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub active: bool,
    pub tags: BTreeSet<String>,
    pub images: GarmentImages,
}

impl CatalogGarment {
    /// Lower-cases and deduplicates the given tags.
    pub fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tags.into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_available(&self) -> bool {
        self.active && self.stock > 0
    }
}

/// Available garments tagged with both the silhouette and the occasion,
/// most recently added first.
pub fn filter_catalog(
    garments: &[CatalogGarment],
    body_shape: BodyShape,
    occasion: Occasion,
) -> Vec<CatalogGarment> {
    let mut matches: Vec<CatalogGarment> = garments
        .iter()
        .filter(|g| g.is_available())
        .filter(|g| g.has_tag(body_shape.as_str()) && g.has_tag(occasion.as_str()))
        .cloned()
        .collect();
    sort_newest_first(&mut matches);
    matches
}

/// Every available garment, most recently added first.
pub fn available_garments(garments: &[CatalogGarment]) -> Vec<CatalogGarment> {
    let mut available: Vec<CatalogGarment> =
        garments.iter().filter(|g| g.is_available()).cloned().collect();
    sort_newest_first(&mut available);
    available
}

// Ids are assigned by a sequence, so a higher id is a more recent garment.
// The sort is stable: duplicate ids keep their input order.
fn sort_newest_first(garments: &mut [CatalogGarment]) {
    garments.sort_by(|a, b| b.id.cmp(&a.id));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn garment(id: i64, tags: &[&str]) -> CatalogGarment {
        CatalogGarment {
            id,
            name: format!("Prenda {id}"),
            category: Some("blusa".to_string()),
            color: Some("azul".to_string()),
            price: Decimal::new(4990, 2),
            stock: 3,
            active: true,
            tags: CatalogGarment::normalize_tags(tags),
            images: GarmentImages::default(),
        }
    }

    fn ids(garments: &[CatalogGarment]) -> Vec<i64> {
        garments.iter().map(|g| g.id).collect()
    }

    #[test]
    fn test_requires_both_tags() {
        let catalog = vec![
            garment(1, &["pera", "oficina"]),
            garment(2, &["pera", "fiesta"]),
            garment(3, &["manzana", "oficina"]),
        ];
        let result = filter_catalog(&catalog, BodyShape::Pera, Occasion::Oficina);
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn test_extra_tags_do_not_prevent_a_match() {
        let catalog = vec![garment(7, &["pera", "oficina", "algodón", "verano"])];
        let result = filter_catalog(&catalog, BodyShape::Pera, Occasion::Oficina);
        assert_eq!(ids(&result), vec![7]);
    }

    #[test]
    fn test_excludes_inactive_and_out_of_stock() {
        let mut inactive = garment(1, &["pera", "oficina"]);
        inactive.active = false;
        let mut sold_out = garment(2, &["pera", "oficina"]);
        sold_out.stock = 0;
        let mut negative = garment(3, &["pera", "oficina"]);
        negative.stock = -1;
        let in_stock = garment(4, &["pera", "oficina"]);

        let result = filter_catalog(
            &[inactive, sold_out, negative, in_stock],
            BodyShape::Pera,
            Occasion::Oficina,
        );
        assert_eq!(ids(&result), vec![4]);
    }

    #[test]
    fn test_orders_most_recent_first() {
        let catalog = vec![
            garment(3, &["rectangulo", "casual"]),
            garment(10, &["rectangulo", "casual"]),
            garment(5, &["rectangulo", "casual"]),
        ];
        let result = filter_catalog(&catalog, BodyShape::Rectangulo, Occasion::Casual);
        assert_eq!(ids(&result), vec![10, 5, 3]);
    }

    #[test]
    fn test_no_matches_is_an_empty_list() {
        let catalog = vec![garment(1, &["pera", "oficina"])];
        assert!(filter_catalog(&catalog, BodyShape::Manzana, Occasion::Formal).is_empty());
        assert!(filter_catalog(&[], BodyShape::Pera, Occasion::Oficina).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let catalog = vec![
            garment(1, &["cita", "reloj_arena"]),
            garment(2, &["reloj_arena"]),
            garment(4, &["cita", "reloj_arena", "seda"]),
        ];
        let once = filter_catalog(&catalog, BodyShape::RelojArena, Occasion::Cita);
        let twice = filter_catalog(&once, BodyShape::RelojArena, Occasion::Cita);
        assert_eq!(once, twice);
        assert_eq!(ids(&once), vec![4, 1]);
    }

    #[test]
    fn test_same_input_gives_same_order() {
        let catalog = vec![
            garment(2, &["pera", "formal"]),
            garment(9, &["pera", "formal"]),
            garment(4, &["pera", "formal"]),
        ];
        let first = filter_catalog(&catalog, BodyShape::Pera, Occasion::Formal);
        for _ in 0..3 {
            assert_eq!(filter_catalog(&catalog, BodyShape::Pera, Occasion::Formal), first);
        }
    }

    #[test]
    fn test_tags_are_normalized() {
        let g = garment(1, &["  PERA", "Oficina ", "pera", ""]);
        assert_eq!(g.tags.len(), 2);
        assert!(g.has_tag("pera"));
        assert!(g.has_tag("oficina"));
    }

    #[test]
    fn test_available_garments_ignores_tags() {
        let mut inactive = garment(2, &[]);
        inactive.active = false;
        let catalog = vec![garment(1, &[]), inactive, garment(3, &["pera"])];
        assert_eq!(ids(&available_garments(&catalog)), vec![3, 1]);
    }
}
