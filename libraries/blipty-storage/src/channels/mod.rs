use blipty_core::{BliptyError, Channel, ChannelId, NewChannel, PlaylistId, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const COLUMNS: &str = "id, playlist_id, category_id, category_name, stream_id, name, stream_type, \
     stream_url, authenticated_stream_url, stream_icon, epg_channel_id, created_at, is_selected";

fn from_row(row: &SqliteRow) -> Channel {
    Channel {
        id: Some(row.get("id")),
        playlist_id: row.get("playlist_id"),
        category_id: row.get("category_id"),
        category_name: row.get("category_name"),
        stream_id: row.get("stream_id"),
        name: row.get("name"),
        stream_type: row.get("stream_type"),
        stream_url: row.get("stream_url"),
        authenticated_stream_url: row.get("authenticated_stream_url"),
        stream_icon: row.get("stream_icon"),
        epg_channel_id: row.get("epg_channel_id"),
        created_at: row.get("created_at"),
        is_selected: row.get::<i64, _>("is_selected") != 0,
    }
}

/// Get the channels of a playlist, ordered by category then name
pub async fn get_by_playlist(pool: &SqlitePool, playlist_id: PlaylistId) -> Result<Vec<Channel>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM channels WHERE playlist_id = ? \
         ORDER BY category_name, name COLLATE NOCASE"
    );
    let rows = sqlx::query(&sql).bind(playlist_id).fetch_all(pool).await?;

    Ok(rows.iter().map(from_row).collect())
}

/// Insert or refresh channels of a playlist
///
/// Channels are keyed by `(playlist_id, stream_id)`; re-importing a stream
/// updates its fields but keeps its identifier and selection flag.
pub async fn insert_many(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    channels: &[NewChannel],
) -> Result<u64> {
    let mut tx = pool.begin().await?;
    let created_at = crate::now_rfc3339();
    let mut written = 0;

    for channel in channels {
        let result = sqlx::query(
            r#"
            INSERT INTO channels (
                playlist_id, category_id, category_name, stream_id, name, stream_type,
                stream_url, authenticated_stream_url, stream_icon, epg_channel_id, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(playlist_id, stream_id) DO UPDATE SET
                category_id = excluded.category_id,
                category_name = excluded.category_name,
                name = excluded.name,
                stream_type = excluded.stream_type,
                stream_url = excluded.stream_url,
                authenticated_stream_url = excluded.authenticated_stream_url,
                stream_icon = excluded.stream_icon,
                epg_channel_id = excluded.epg_channel_id
            "#,
        )
        .bind(playlist_id)
        .bind(&channel.category_id)
        .bind(&channel.category_name)
        .bind(&channel.stream_id)
        .bind(&channel.name)
        .bind(&channel.stream_type)
        .bind(&channel.stream_url)
        .bind(&channel.authenticated_stream_url)
        .bind(&channel.stream_icon)
        .bind(&channel.epg_channel_id)
        .bind(&created_at)
        .execute(&mut *tx)
        .await?;

        written += result.rows_affected();
    }

    tx.commit().await?;

    Ok(written)
}

/// Mark one channel as the playlist's selection
///
/// Clears the previous selection of the same playlist only.
pub async fn set_selected(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    channel_id: ChannelId,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query("SELECT 1 FROM channels WHERE id = ? AND playlist_id = ?")
        .bind(channel_id)
        .bind(playlist_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(BliptyError::not_found("Channel", channel_id));
    }

    sqlx::query("UPDATE channels SET is_selected = 0 WHERE playlist_id = ? AND is_selected = 1")
        .bind(playlist_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE channels SET is_selected = 1 WHERE id = ?")
        .bind(channel_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

/// Get the selected channel of a playlist
pub async fn get_selected(pool: &SqlitePool, playlist_id: PlaylistId) -> Result<Option<Channel>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM channels WHERE playlist_id = ? AND is_selected = 1 LIMIT 1"
    );
    let row = sqlx::query(&sql)
        .bind(playlist_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(from_row))
}
