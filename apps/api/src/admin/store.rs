use std::collections::BTreeSet;

use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool};

use crate::admin::payload::{infer_tag_category, GarmentDraft, NewImage};
use crate::models::body_type::BodyTypeRow;
use crate::models::client::ClientActivityRow;
use crate::models::garment::{GarmentImageRow, GarmentRow, TagRow};
use crate::styling::body_shape::BodyShape;

const CLIENT_LIST_LIMIT: i64 = 500;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TodayStats {
    pub total_clients: i64,
    pub active_garments: i64,
    pub clients_today: i64,
    pub tryons_today: i64,
}

/// A garment with every image row and its tag names.
#[derive(Debug, Clone, Serialize)]
pub struct GarmentDetail {
    pub garment: GarmentRow,
    pub images: Vec<GarmentImageRow>,
    pub tags: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Garments
// ────────────────────────────────────────────────────────────────────────────

pub async fn get_garment_detail(
    pool: &PgPool,
    id: i64,
) -> Result<Option<GarmentDetail>, sqlx::Error> {
    let Some(garment) = sqlx::query_as::<_, GarmentRow>("SELECT * FROM garments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let images = sqlx::query_as::<_, GarmentImageRow>(
        "SELECT * FROM garment_images WHERE garment_id = $1 ORDER BY kind, position, id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let tags: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT t.name FROM tags t
        JOIN garment_tags gt ON gt.tag_id = t.id
        WHERE gt.garment_id = $1
        ORDER BY LOWER(t.name)
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(GarmentDetail {
        garment,
        images,
        tags,
    }))
}

/// Inserts the garment, its images and tags in one transaction.
pub async fn create_garment(pool: &PgPool, draft: &GarmentDraft) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO garments (name, category, color, price, stock, active)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(&draft.name)
    .bind(&draft.category)
    .bind(&draft.color)
    .bind(draft.price)
    .bind(draft.stock)
    .bind(draft.active)
    .fetch_one(&mut *tx)
    .await?;

    insert_images(&mut *tx, id, &draft.images).await?;
    if let Some(tags) = &draft.tags {
        attach_tags(&mut *tx, id, tags).await?;
    }

    tx.commit().await?;
    Ok(id)
}

/// Updates the garment fields. Non-empty `images` replace the stored images;
/// present `tags` replace the tag set. Returns `false` for an unknown id.
pub async fn update_garment(
    pool: &PgPool,
    id: i64,
    draft: &GarmentDraft,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let updated: Option<i64> = sqlx::query_scalar(
        r#"
        UPDATE garments
        SET name = $2, category = $3, color = $4, price = $5, stock = $6, active = $7
        WHERE id = $1
        RETURNING id
        "#,
    )
    .bind(id)
    .bind(&draft.name)
    .bind(&draft.category)
    .bind(&draft.color)
    .bind(draft.price)
    .bind(draft.stock)
    .bind(draft.active)
    .fetch_optional(&mut *tx)
    .await?;

    if updated.is_none() {
        return Ok(false);
    }

    if !draft.images.is_empty() {
        sqlx::query("DELETE FROM garment_images WHERE garment_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_images(&mut *tx, id, &draft.images).await?;
    }

    if let Some(tags) = &draft.tags {
        sqlx::query("DELETE FROM garment_tags WHERE garment_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        attach_tags(&mut *tx, id, tags).await?;
    }

    tx.commit().await?;
    Ok(true)
}

pub async fn set_garment_active(pool: &PgPool, id: i64, active: bool) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE garments SET active = $2 WHERE id = $1")
        .bind(id)
        .bind(active)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Images, tag links and try-on results go with it (ON DELETE CASCADE).
pub async fn delete_garment(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM garments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_garment_image(
    pool: &PgPool,
    garment_id: i64,
    image_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM garment_images WHERE id = $1 AND garment_id = $2")
        .bind(image_id)
        .bind(garment_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn insert_images(
    conn: &mut PgConnection,
    garment_id: i64,
    images: &[NewImage],
) -> Result<(), sqlx::Error> {
    for image in images {
        sqlx::query(
            "INSERT INTO garment_images (garment_id, kind, url, position) VALUES ($1, $2, $3, $4)",
        )
        .bind(garment_id)
        .bind(image.kind.as_str())
        .bind(&image.url)
        .bind(image.position)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Links tags to a garment, creating missing ones with an inferred category.
async fn attach_tags(
    conn: &mut PgConnection,
    garment_id: i64,
    tags: &BTreeSet<String>,
) -> Result<(), sqlx::Error> {
    for name in tags {
        // No-op update so RETURNING yields the existing row on conflict
        let tag_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO tags (name, category) VALUES ($1, $2)
            ON CONFLICT ((LOWER(name))) DO UPDATE SET name = tags.name
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(infer_tag_category(name))
        .fetch_one(&mut *conn)
        .await?;

        sqlx::query(
            "INSERT INTO garment_tags (garment_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(garment_id)
        .bind(tag_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tags
// ────────────────────────────────────────────────────────────────────────────

pub async fn list_tags(pool: &PgPool) -> Result<Vec<TagRow>, sqlx::Error> {
    sqlx::query_as::<_, TagRow>("SELECT * FROM tags ORDER BY category, LOWER(name)")
        .fetch_all(pool)
        .await
}

/// Case-insensitive upsert: an existing tag keeps its id and takes the new
/// spelling and category.
pub async fn upsert_tag(pool: &PgPool, name: &str, category: &str) -> Result<TagRow, sqlx::Error> {
    sqlx::query_as::<_, TagRow>(
        r#"
        INSERT INTO tags (name, category) VALUES ($1, $2)
        ON CONFLICT ((LOWER(name))) DO UPDATE SET
            name = EXCLUDED.name,
            category = EXCLUDED.category
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(category)
    .fetch_one(pool)
    .await
}

pub async fn delete_tag(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tags WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ────────────────────────────────────────────────────────────────────────────
// Body types, clients, stats
// ────────────────────────────────────────────────────────────────────────────

pub async fn list_body_types(pool: &PgPool) -> Result<Vec<BodyTypeRow>, sqlx::Error> {
    sqlx::query_as::<_, BodyTypeRow>("SELECT * FROM body_types ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn upsert_body_type(
    pool: &PgPool,
    code: BodyShape,
    name: &str,
    image_url: &str,
) -> Result<BodyTypeRow, sqlx::Error> {
    sqlx::query_as::<_, BodyTypeRow>(
        r#"
        INSERT INTO body_types (code, name, image_url) VALUES ($1, $2, $3)
        ON CONFLICT (code) DO UPDATE SET
            name = EXCLUDED.name,
            image_url = EXCLUDED.image_url
        RETURNING *
        "#,
    )
    .bind(code.as_str())
    .bind(name)
    .bind(image_url)
    .fetch_one(pool)
    .await
}

pub async fn list_clients(pool: &PgPool) -> Result<Vec<ClientActivityRow>, sqlx::Error> {
    sqlx::query_as::<_, ClientActivityRow>(
        r#"
        SELECT
            c.id, c.first_name, c.last_name, c.email, c.phone, c.age_range, c.created_at,
            (SELECT COUNT(*) FROM client_photos p WHERE p.client_id = c.id) AS photos,
            (SELECT COUNT(*) FROM tryon_results t WHERE t.client_id = c.id) AS try_ons
        FROM clients c
        ORDER BY c.id DESC
        LIMIT $1
        "#,
    )
    .bind(CLIENT_LIST_LIMIT)
    .fetch_all(pool)
    .await
}

/// Counts for the current server-local day.
pub async fn today_stats(pool: &PgPool) -> Result<TodayStats, sqlx::Error> {
    sqlx::query_as::<_, TodayStats>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM clients) AS total_clients,
            (SELECT COUNT(*) FROM garments WHERE active) AS active_garments,
            (SELECT COUNT(*) FROM clients WHERE created_at::date = CURRENT_DATE) AS clients_today,
            (SELECT COUNT(*) FROM tryon_results WHERE created_at::date = CURRENT_DATE) AS tryons_today
        "#,
    )
    .fetch_one(pool)
    .await
}
