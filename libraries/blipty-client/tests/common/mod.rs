//! mockall doubles for the backend traits

#![allow(dead_code)]

use async_trait::async_trait;
use blipty_core::{
    Category, Channel, ChannelId, Favorite, LibraryBackend, NewFavorite, PlayerBackend,
    PlayerEvent, Playlist, PlaylistId, Result, StreamInfo, StreamQuality,
};
use mockall::mock;
use tokio::sync::broadcast;

mock! {
    pub Library {}

    #[async_trait]
    impl LibraryBackend for Library {
        async fn initialize_database(&self) -> Result<()>;
        async fn add_playlist(&self, playlist: &Playlist) -> Result<PlaylistId>;
        async fn get_playlists(&self) -> Result<Vec<Playlist>>;
        async fn update_playlist(&self, id: PlaylistId, playlist: &Playlist) -> Result<()>;
        async fn delete_playlist(&self, id: PlaylistId) -> Result<()>;
        async fn fetch_channels(&self, playlist_id: PlaylistId) -> Result<Vec<Channel>>;
        async fn fetch_and_populate_data(
            &self,
            playlist_id: PlaylistId,
            server_url: &str,
            username: &str,
            password: &str,
        ) -> Result<()>;
        async fn set_selected_channel(&self, playlist_id: PlaylistId, channel_id: ChannelId) -> Result<()>;
        async fn get_selected_channel(&self, playlist_id: PlaylistId) -> Result<Option<Channel>>;
        async fn get_categories(&self, playlist_id: PlaylistId) -> Result<Vec<Category>>;
        async fn add_favorite(&self, favorite: &NewFavorite) -> Result<Favorite>;
        async fn remove_favorite(&self, playlist_id: PlaylistId, stream_id: &str) -> Result<bool>;
        async fn get_favorites(&self, playlist_id: PlaylistId) -> Result<Vec<Favorite>>;
    }
}

mock! {
    pub Player {}

    #[async_trait]
    impl PlayerBackend for Player {
        async fn play_video(&self, url: &str) -> Result<()>;
        async fn pause_video(&self) -> Result<()>;
        async fn resume_video(&self) -> Result<()>;
        async fn stop_video(&self) -> Result<()>;
        async fn set_volume(&self, volume: f64) -> Result<()>;
        async fn seek(&self, position: f64) -> Result<()>;
        async fn get_stream_info(&self) -> Result<StreamInfo>;
        async fn set_quality(&self, quality: &StreamQuality) -> Result<()>;
        fn events(&self) -> broadcast::Receiver<PlayerEvent>;
    }
}

pub fn playlist(id: PlaylistId, server_url: &str) -> Playlist {
    Playlist {
        id: Some(id),
        ..Playlist::new("Home", server_url, "alice", "secret")
    }
}

pub fn channel(playlist_id: PlaylistId, stream_id: &str) -> Channel {
    Channel {
        id: Some(1),
        playlist_id,
        category_id: None,
        category_name: None,
        stream_id: stream_id.to_string(),
        name: format!("Channel {stream_id}"),
        stream_type: "live".to_string(),
        stream_url: format!("http://provider.test:8080/live/alice/secret/{stream_id}.ts"),
        authenticated_stream_url: None,
        stream_icon: None,
        epg_channel_id: None,
        created_at: None,
        is_selected: false,
    }
}
