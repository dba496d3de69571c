use crate::{categories, channels, favorites, import, playlists};
use async_trait::async_trait;
use blipty_core::{
    BliptyError, Category, Channel, ChannelId, Favorite, LibraryBackend, NewChannel, NewFavorite,
    Playlist, PlaylistId, Result,
};
use serde_json::Value;
use sqlx::SqlitePool;

/// Library backend over the local `SQLite` fallback store
#[derive(Clone)]
pub struct LocalLibrary {
    pool: SqlitePool,
}

impl LocalLibrary {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Store channels for a playlist and register the categories they name
    ///
    /// Categories are only registered for channels whose `category_id` is
    /// numeric and that carry a category name.
    pub async fn import_channels(
        &self,
        playlist_id: PlaylistId,
        channels: &[NewChannel],
    ) -> Result<u64> {
        if playlists::get_by_id(&self.pool, playlist_id).await?.is_none() {
            return Err(BliptyError::not_found("Playlist", playlist_id));
        }

        for channel in channels {
            let (Some(id), Some(name)) = (&channel.category_id, &channel.category_name) else {
                continue;
            };
            let Ok(category_id) = id.parse::<i64>() else {
                continue;
            };
            categories::upsert(
                &self.pool,
                &Category {
                    id: None,
                    category_id,
                    name: name.clone(),
                    content_type: channel.stream_type.clone(),
                    parent_id: None,
                },
            )
            .await?;
        }

        let written = channels::insert_many(&self.pool, playlist_id, channels).await?;
        playlists::touch_last_updated(&self.pool, playlist_id).await?;

        tracing::info!(playlist_id, written, "Imported channels");

        Ok(written)
    }

    /// Import an M3U document into a playlist
    ///
    /// The header's guide URL is stored on the playlist when it has none.
    pub async fn import_m3u(&self, playlist_id: PlaylistId, content: &str) -> Result<u64> {
        let parsed = import::parse_m3u(content)?;
        let written = self.import_channels(playlist_id, &parsed.channels).await?;

        if let Some(epg_url) = parsed.epg_url {
            if let Some(mut playlist) = playlists::get_by_id(&self.pool, playlist_id).await? {
                if playlist.epg_url.is_none() {
                    tracing::debug!(playlist_id, epg_url = %epg_url, "Guide URL taken from M3U header");
                    playlist.epg_url = Some(epg_url);
                    playlists::update(&self.pool, playlist_id, &playlist).await?;
                }
            }
        }

        Ok(written)
    }

    /// Import an Xtream streams payload into a playlist
    ///
    /// Categories are read from `category_payload` when given, otherwise from the
    /// payload itself, which is where `panel_api.php` puts them.
    pub async fn import_xtream(
        &self,
        playlist_id: PlaylistId,
        streams: &Value,
        category_payload: Option<&Value>,
        stream_type: &str,
    ) -> Result<u64> {
        let playlist = playlists::get_by_id(&self.pool, playlist_id)
            .await?
            .ok_or_else(|| BliptyError::not_found("Playlist", playlist_id))?;

        let found = import::extract_categories(category_payload.unwrap_or(streams));
        for category in &found {
            categories::upsert(&self.pool, category).await?;
        }

        let channels = import::extract_channels(streams, stream_type, &found, &playlist);
        self.import_channels(playlist_id, &channels).await
    }
}

#[async_trait]
impl LibraryBackend for LocalLibrary {
    async fn initialize_database(&self) -> Result<()> {
        crate::run_migrations(&self.pool).await?;
        Ok(())
    }

    // Playlists
    async fn add_playlist(&self, playlist: &Playlist) -> Result<PlaylistId> {
        playlists::create(&self.pool, playlist).await
    }

    async fn get_playlists(&self) -> Result<Vec<Playlist>> {
        playlists::get_all(&self.pool).await
    }

    async fn update_playlist(&self, id: PlaylistId, playlist: &Playlist) -> Result<()> {
        playlists::update(&self.pool, id, playlist).await
    }

    async fn delete_playlist(&self, id: PlaylistId) -> Result<()> {
        playlists::delete(&self.pool, id).await
    }

    // Channels
    async fn fetch_channels(&self, playlist_id: PlaylistId) -> Result<Vec<Channel>> {
        channels::get_by_playlist(&self.pool, playlist_id).await
    }

    async fn fetch_and_populate_data(
        &self,
        playlist_id: PlaylistId,
        server_url: &str,
        _username: &str,
        _password: &str,
    ) -> Result<()> {
        tracing::debug!(playlist_id, server_url, "Provider fetch requested on local store");
        Err(BliptyError::Unsupported(
            "the local store cannot fetch channels from a provider".to_string(),
        ))
    }

    async fn set_selected_channel(
        &self,
        playlist_id: PlaylistId,
        channel_id: ChannelId,
    ) -> Result<()> {
        channels::set_selected(&self.pool, playlist_id, channel_id).await
    }

    async fn get_selected_channel(&self, playlist_id: PlaylistId) -> Result<Option<Channel>> {
        channels::get_selected(&self.pool, playlist_id).await
    }

    async fn get_categories(&self, playlist_id: PlaylistId) -> Result<Vec<Category>> {
        categories::get_for_playlist(&self.pool, playlist_id).await
    }

    // Favorites
    async fn add_favorite(&self, favorite: &NewFavorite) -> Result<Favorite> {
        favorites::add(&self.pool, favorite).await
    }

    async fn remove_favorite(&self, playlist_id: PlaylistId, stream_id: &str) -> Result<bool> {
        favorites::remove(&self.pool, playlist_id, stream_id).await
    }

    async fn get_favorites(&self, playlist_id: PlaylistId) -> Result<Vec<Favorite>> {
        favorites::get_by_playlist(&self.pool, playlist_id).await
    }
}
