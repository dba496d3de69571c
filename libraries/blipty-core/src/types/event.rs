//! Push-events delivered by the backend on the `player-event` channel

use super::playback_state::StreamQuality;
use serde::{Deserialize, Serialize};

/// Name of the backend channel carrying [`PlayerEvent`]s
pub const PLAYER_EVENT_CHANNEL: &str = "player-event";

/// Error details attached to a [`PlayerEvent::Error`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerErrorInfo {
    pub code: i32,
    pub message: String,
}

/// Backend notification, serialized as `{"type": ..., "data": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum PlayerEvent {
    /// Backend pipeline changed state (`playing`, `paused`, ...)
    StateChanged { state: String },

    /// Buffer fill level, 0-100
    BufferingProgress { percent: i32 },

    /// Backend switched rendition
    QualityChanged { quality: StreamQuality },

    /// Backend pipeline failed
    Error { error: PlayerErrorInfo },

    /// Stream reached its end
    EndOfStream,
}
