use blipty_core::{BliptyError, Playlist, PlaylistId, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn from_row(row: &SqliteRow) -> Playlist {
    Playlist {
        id: Some(row.get("id")),
        name: row.get("name"),
        server_url: row.get("server_url"),
        username: row.get("username"),
        password: row.get("password"),
        epg_url: row.get("epg_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        last_updated: row.get("last_updated"),
        is_active: row.get::<i64, _>("is_active") != 0,
    }
}

/// Get all playlists in creation order
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, server_url, username, password, epg_url,
               created_at, updated_at, last_updated, is_active
        FROM playlists
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(from_row).collect())
}

/// Get playlist by ID
pub async fn get_by_id(pool: &SqlitePool, id: PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, server_url, username, password, epg_url,
               created_at, updated_at, last_updated, is_active
        FROM playlists
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(from_row))
}

/// Create new playlist, returning its identifier
///
/// Any `id` or timestamps carried by `playlist` are ignored; the store
/// assigns them.
pub async fn create(pool: &SqlitePool, playlist: &Playlist) -> Result<PlaylistId> {
    validate(playlist)?;

    let result = sqlx::query(
        r#"
        INSERT INTO playlists (name, server_url, username, password, epg_url, created_at, is_active)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&playlist.name)
    .bind(&playlist.server_url)
    .bind(&playlist.username)
    .bind(&playlist.password)
    .bind(&playlist.epg_url)
    .bind(crate::now_rfc3339())
    .bind(playlist.is_active)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Replace the editable fields of a playlist
pub async fn update(pool: &SqlitePool, id: PlaylistId, playlist: &Playlist) -> Result<()> {
    validate(playlist)?;

    let result = sqlx::query(
        r#"
        UPDATE playlists
        SET name = ?, server_url = ?, username = ?, password = ?, epg_url = ?,
            is_active = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&playlist.name)
    .bind(&playlist.server_url)
    .bind(&playlist.username)
    .bind(&playlist.password)
    .bind(&playlist.epg_url)
    .bind(playlist.is_active)
    .bind(crate::now_rfc3339())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(BliptyError::not_found("Playlist", id));
    }

    Ok(())
}

/// Delete playlist (channels and favorites cascade)
pub async fn delete(pool: &SqlitePool, id: PlaylistId) -> Result<()> {
    let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(BliptyError::not_found("Playlist", id));
    }

    Ok(())
}

/// Record that the channel listing of a playlist was refreshed
pub async fn touch_last_updated(pool: &SqlitePool, id: PlaylistId) -> Result<()> {
    sqlx::query("UPDATE playlists SET last_updated = ? WHERE id = ?")
        .bind(crate::now_rfc3339())
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

fn validate(playlist: &Playlist) -> Result<()> {
    if playlist.name.trim().is_empty() {
        return Err(BliptyError::invalid_input("playlist name must not be empty"));
    }
    if playlist.server_url.trim().is_empty() {
        return Err(BliptyError::invalid_input("server URL must not be empty"));
    }
    Ok(())
}
