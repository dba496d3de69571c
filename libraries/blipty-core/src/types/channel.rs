//! Channel and category types

use super::playlist::PlaylistId;
use serde::{Deserialize, Serialize};

pub type ChannelId = i64;

/// A stream entry of a playlist, as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default)]
    pub id: Option<ChannelId>,
    pub playlist_id: PlaylistId,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    pub stream_id: String,
    pub name: String,
    pub stream_type: String,
    pub stream_url: String,
    #[serde(default)]
    pub authenticated_stream_url: Option<String>,
    #[serde(default)]
    pub stream_icon: Option<String>,
    #[serde(default)]
    pub epg_channel_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub is_selected: bool,
}

impl Channel {
    /// URL to hand to the player: the authenticated one when the provider gave one
    pub fn playback_url(&self) -> &str {
        self.authenticated_stream_url
            .as_deref()
            .unwrap_or(&self.stream_url)
    }
}

/// Data for inserting a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewChannel {
    pub stream_id: String,
    pub name: String,
    pub stream_type: String,
    pub stream_url: String,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub authenticated_stream_url: Option<String>,
    pub stream_icon: Option<String>,
    pub epg_channel_id: Option<String>,
}

/// Provider category (live, vod, movie or series)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: Option<i64>,
    pub category_id: i64,
    pub name: String,
    pub content_type: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
}
