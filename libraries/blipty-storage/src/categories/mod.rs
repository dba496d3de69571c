use blipty_core::{Category, PlaylistId, Result};
use sqlx::{Row, SqlitePool};

/// Values accepted by the `type` column check constraint
const KNOWN_TYPES: [&str; 4] = ["live", "vod", "movie", "series"];

/// Insert or rename a category, keyed by the provider's `category_id`
pub async fn upsert(pool: &SqlitePool, category: &Category) -> Result<()> {
    let kind = if KNOWN_TYPES.contains(&category.content_type.as_str()) {
        category.content_type.as_str()
    } else {
        "movie"
    };

    sqlx::query(
        r#"
        INSERT INTO categories (category_id, name, content_type, type, parent_id)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(category_id) DO UPDATE SET
            name = excluded.name,
            content_type = excluded.content_type,
            type = excluded.type,
            parent_id = excluded.parent_id,
            updated_at = strftime('%s', 'now')
        "#,
    )
    .bind(category.category_id)
    .bind(&category.name)
    .bind(&category.content_type)
    .bind(kind)
    .bind(category.parent_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Categories referenced by at least one channel of the playlist
pub async fn get_for_playlist(pool: &SqlitePool, playlist_id: PlaylistId) -> Result<Vec<Category>> {
    let rows = sqlx::query(
        r#"
        SELECT DISTINCT c.id, c.category_id, c.name, c.content_type, c.parent_id
        FROM categories c
        INNER JOIN channels ch ON ch.category_id = CAST(c.category_id AS TEXT)
        WHERE ch.playlist_id = ?
        ORDER BY c.name
        "#,
    )
    .bind(playlist_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Category {
            id: row.get("id"),
            category_id: row.get("category_id"),
            name: row.get("name"),
            content_type: row.get("content_type"),
            parent_id: row.get("parent_id"),
        })
        .collect())
}
