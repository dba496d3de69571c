//! Playlist and channel commands
//!
//! [`Library`] forwards to a [`LibraryBackend`], logging failures before
//! returning them unchanged. Channel listings are populated from the
//! provider on first use.

use blipty_core::{
    BliptyError, Category, Channel, ChannelId, Favorite, LibraryBackend, NewFavorite, Playlist,
    PlaylistId, Result,
};
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct Library {
    backend: Arc<dyn LibraryBackend>,
}

impl Library {
    pub fn new(backend: Arc<dyn LibraryBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn LibraryBackend> {
        &self.backend
    }

    pub async fn initialize_database(&self) -> Result<()> {
        self.backend
            .initialize_database()
            .await
            .map_err(|e| logged("initialize_database", e))
    }

    // Playlists
    pub async fn add_playlist(&self, playlist: &Playlist) -> Result<PlaylistId> {
        let id = self
            .backend
            .add_playlist(playlist)
            .await
            .map_err(|e| logged("add_playlist", e))?;
        info!(playlist_id = id, name = %playlist.name, "Playlist added");
        Ok(id)
    }

    pub async fn get_playlists(&self) -> Result<Vec<Playlist>> {
        self.backend
            .get_playlists()
            .await
            .map_err(|e| logged("get_playlists", e))
    }

    pub async fn update_playlist(&self, id: PlaylistId, playlist: &Playlist) -> Result<()> {
        self.backend
            .update_playlist(id, playlist)
            .await
            .map_err(|e| logged("update_playlist", e))
    }

    pub async fn delete_playlist(&self, id: PlaylistId) -> Result<()> {
        self.backend
            .delete_playlist(id)
            .await
            .map_err(|e| logged("delete_playlist", e))?;
        info!(playlist_id = id, "Playlist deleted");
        Ok(())
    }

    /// Channels of a playlist, fetched from the provider when none are stored
    ///
    /// An empty listing triggers exactly one fetch-and-populate using the
    /// playlist's credentials, followed by a refetch. A playlist that does
    /// not exist yields an empty list.
    pub async fn fetch_channels(&self, playlist_id: PlaylistId) -> Result<Vec<Channel>> {
        let channels = self
            .backend
            .fetch_channels(playlist_id)
            .await
            .map_err(|e| logged("fetch_channels", e))?;
        if !channels.is_empty() {
            debug!(playlist_id, count = channels.len(), "Using stored channels");
            return Ok(channels);
        }

        let playlist = self
            .get_playlists()
            .await?
            .into_iter()
            .find(|p| p.id == Some(playlist_id));
        let Some(playlist) = playlist else {
            debug!(playlist_id, "No channels and no such playlist");
            return Ok(Vec::new());
        };

        let server_url = playlist.normalized_server_url();
        info!(playlist_id, server_url = %server_url, "No stored channels, fetching from provider");

        self.backend
            .fetch_and_populate_data(
                playlist_id,
                &server_url,
                &playlist.username,
                &playlist.password,
            )
            .await
            .map_err(|e| logged("fetch_and_populate_data", e))?;

        let channels = self
            .backend
            .fetch_channels(playlist_id)
            .await
            .map_err(|e| logged("fetch_channels", e))?;
        info!(playlist_id, count = channels.len(), "Channels populated");
        Ok(channels)
    }

    // Selection
    pub async fn set_selected_channel(
        &self,
        playlist_id: PlaylistId,
        channel_id: ChannelId,
    ) -> Result<()> {
        self.backend
            .set_selected_channel(playlist_id, channel_id)
            .await
            .map_err(|e| logged("set_selected_channel", e))
    }

    pub async fn get_selected_channel(&self, playlist_id: PlaylistId) -> Result<Option<Channel>> {
        self.backend
            .get_selected_channel(playlist_id)
            .await
            .map_err(|e| logged("get_selected_channel", e))
    }

    pub async fn get_categories(&self, playlist_id: PlaylistId) -> Result<Vec<Category>> {
        self.backend
            .get_categories(playlist_id)
            .await
            .map_err(|e| logged("get_categories", e))
    }

    // Favorites
    pub async fn add_favorite(&self, favorite: &NewFavorite) -> Result<Favorite> {
        self.backend
            .add_favorite(favorite)
            .await
            .map_err(|e| logged("add_favorite", e))
    }

    pub async fn remove_favorite(&self, playlist_id: PlaylistId, stream_id: &str) -> Result<bool> {
        self.backend
            .remove_favorite(playlist_id, stream_id)
            .await
            .map_err(|e| logged("remove_favorite", e))
    }

    pub async fn get_favorites(&self, playlist_id: PlaylistId) -> Result<Vec<Favorite>> {
        self.backend
            .get_favorites(playlist_id)
            .await
            .map_err(|e| logged("get_favorites", e))
    }
}

fn logged(command: &str, err: BliptyError) -> BliptyError {
    error!(command, error = %err, "Library command failed");
    err
}
