//! Backend command surface
//!
//! The client never talks to providers or to the player pipeline directly;
//! every request goes through one of these traits. Command names mirror the
//! native backend's (`add_playlist`, `play_video`, ...) so a bridge can map
//! them one to one.

use crate::error::Result;
use crate::types::{
    Category, Channel, ChannelId, Favorite, NewFavorite, PlayerEvent, Playlist, PlaylistId,
    StreamInfo, StreamQuality,
};
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Playlist, channel and favorite persistence
///
/// Implemented by the native command bridge and by the local `SQLite`
/// fallback store.
#[async_trait]
pub trait LibraryBackend: Send + Sync {
    /// Create the schema if needed
    async fn initialize_database(&self) -> Result<()>;

    // ========================================================================
    // Playlists
    // ========================================================================

    /// Store a playlist, returning its new identifier
    async fn add_playlist(&self, playlist: &Playlist) -> Result<PlaylistId>;

    /// Get all playlists
    async fn get_playlists(&self) -> Result<Vec<Playlist>>;

    /// Replace the stored fields of a playlist
    async fn update_playlist(&self, id: PlaylistId, playlist: &Playlist) -> Result<()>;

    /// Delete a playlist and everything that belongs to it
    async fn delete_playlist(&self, id: PlaylistId) -> Result<()>;

    // ========================================================================
    // Channels
    // ========================================================================

    /// Stored channels of a playlist (never fetches from the provider)
    async fn fetch_channels(&self, playlist_id: PlaylistId) -> Result<Vec<Channel>>;

    /// Download the provider's listing and store it for `playlist_id`
    async fn fetch_and_populate_data(
        &self,
        playlist_id: PlaylistId,
        server_url: &str,
        username: &str,
        password: &str,
    ) -> Result<()>;

    /// Mark one channel of a playlist as selected
    async fn set_selected_channel(&self, playlist_id: PlaylistId, channel_id: ChannelId)
        -> Result<()>;

    /// Currently selected channel of a playlist, if any
    async fn get_selected_channel(&self, playlist_id: PlaylistId) -> Result<Option<Channel>>;

    /// Categories known for a playlist's provider
    async fn get_categories(&self, playlist_id: PlaylistId) -> Result<Vec<Category>>;

    // ========================================================================
    // Favorites
    // ========================================================================

    /// Pin a stream; pinning twice is a no-op
    async fn add_favorite(&self, favorite: &NewFavorite) -> Result<Favorite>;

    /// Unpin a stream, returning whether it was pinned
    async fn remove_favorite(&self, playlist_id: PlaylistId, stream_id: &str) -> Result<bool>;

    /// Favorites of a playlist, newest first
    async fn get_favorites(&self, playlist_id: PlaylistId) -> Result<Vec<Favorite>>;
}

/// Playback pipeline owned by the backend
#[async_trait]
pub trait PlayerBackend: Send + Sync {
    async fn play_video(&self, url: &str) -> Result<()>;

    async fn pause_video(&self) -> Result<()>;

    async fn resume_video(&self) -> Result<()>;

    async fn stop_video(&self) -> Result<()>;

    /// Volume in `[0, 1]`
    async fn set_volume(&self, volume: f64) -> Result<()>;

    /// Position in seconds
    async fn seek(&self, position: f64) -> Result<()>;

    async fn get_stream_info(&self) -> Result<StreamInfo>;

    async fn set_quality(&self, quality: &StreamQuality) -> Result<()>;

    /// Subscribe to the `player-event` push channel
    fn events(&self) -> broadcast::Receiver<PlayerEvent>;
}
