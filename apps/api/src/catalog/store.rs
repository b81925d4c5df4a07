use sqlx::PgPool;

use crate::catalog::filter::CatalogGarment;
use crate::models::garment::GarmentListingRow;

/// Garments with lower-cased tag names and the first active image of each kind.
/// Shared with the admin listing.
pub(crate) const GARMENT_LISTING_SQL: &str = r#"
    SELECT
        g.id, g.name, g.category, g.color, g.price, g.stock, g.active,
        COALESCE(
            ARRAY_AGG(DISTINCT LOWER(t.name)) FILTER (WHERE t.id IS NOT NULL),
            '{}'::text[]
        ) AS tags,
        (SELECT gi.url FROM garment_images gi
          WHERE gi.garment_id = g.id AND gi.kind = 'front' AND gi.active
          ORDER BY gi.position, gi.id LIMIT 1) AS front_image,
        (SELECT gi.url FROM garment_images gi
          WHERE gi.garment_id = g.id AND gi.kind = 'back' AND gi.active
          ORDER BY gi.position, gi.id LIMIT 1) AS back_image,
        (SELECT gi.url FROM garment_images gi
          WHERE gi.garment_id = g.id AND gi.kind = 'overlay' AND gi.active
          ORDER BY gi.position, gi.id LIMIT 1) AS overlay_image
    FROM garments g
    LEFT JOIN garment_tags gt ON gt.garment_id = g.id
    LEFT JOIN tags t ON t.id = gt.tag_id
"#;

/// Loads every garment, active or not. Filtering happens in memory.
pub async fn load_garments(pool: &PgPool) -> Result<Vec<CatalogGarment>, sqlx::Error> {
    let sql = format!("{GARMENT_LISTING_SQL} GROUP BY g.id ORDER BY g.id DESC");
    let rows = sqlx::query_as::<_, GarmentListingRow>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(CatalogGarment::from).collect())
}

/// Loads one garment regardless of its active flag.
pub async fn load_garment(pool: &PgPool, id: i64) -> Result<Option<CatalogGarment>, sqlx::Error> {
    let sql = format!("{GARMENT_LISTING_SQL} WHERE g.id = $1 GROUP BY g.id");
    let row = sqlx::query_as::<_, GarmentListingRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(CatalogGarment::from))
}
