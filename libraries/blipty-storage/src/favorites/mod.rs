use blipty_core::{BliptyError, Favorite, NewFavorite, PlaylistId, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn from_row(row: &SqliteRow) -> Favorite {
    Favorite {
        id: row.get("id"),
        playlist_id: row.get("playlist_id"),
        stream_id: row.get("stream_id"),
        content_type: row.get("content_type"),
        created_at: row.get("created_at"),
    }
}

/// Pin a stream; adding an existing favorite returns the stored one
pub async fn add(pool: &SqlitePool, favorite: &NewFavorite) -> Result<Favorite> {
    sqlx::query(
        r#"
        INSERT INTO favorites (playlist_id, stream_id, content_type)
        VALUES (?, ?, ?)
        ON CONFLICT(playlist_id, stream_id) DO NOTHING
        "#,
    )
    .bind(favorite.playlist_id)
    .bind(&favorite.stream_id)
    .bind(&favorite.content_type)
    .execute(pool)
    .await?;

    let row = sqlx::query(
        r#"
        SELECT id, playlist_id, stream_id, content_type, created_at
        FROM favorites
        WHERE playlist_id = ? AND stream_id = ?
        "#,
    )
    .bind(favorite.playlist_id)
    .bind(&favorite.stream_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref()
        .map(from_row)
        .ok_or_else(|| BliptyError::storage("Failed to retrieve created favorite"))
}

/// Unpin a stream, returning whether it was pinned
pub async fn remove(pool: &SqlitePool, playlist_id: PlaylistId, stream_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM favorites WHERE playlist_id = ? AND stream_id = ?")
        .bind(playlist_id)
        .bind(stream_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Favorites of a playlist, most recent first
pub async fn get_by_playlist(pool: &SqlitePool, playlist_id: PlaylistId) -> Result<Vec<Favorite>> {
    let rows = sqlx::query(
        r#"
        SELECT id, playlist_id, stream_id, content_type, created_at
        FROM favorites
        WHERE playlist_id = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(playlist_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(from_row).collect())
}
