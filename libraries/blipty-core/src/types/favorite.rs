//! Favorite channel markers

use super::playlist::PlaylistId;
use serde::{Deserialize, Serialize};

/// A stream the user pinned within a playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: i64,
    pub playlist_id: PlaylistId,
    pub stream_id: String,
    pub content_type: String,
    /// Unix epoch seconds
    pub created_at: i64,
}

/// Data for creating a favorite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFavorite {
    pub playlist_id: PlaylistId,
    pub stream_id: String,
    pub content_type: String,
}
