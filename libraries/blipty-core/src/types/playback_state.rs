//! Player state types shared by the store, the session and the backends
use serde::{Deserialize, Serialize};

/// Coarse playback status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    Playing,
    Paused,
    #[default]
    Stopped,
    Error,
}

impl PlaybackStatus {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
            Self::Error => "error",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "playing" => Some(Self::Playing),
            "paused" => Some(Self::Paused),
            "stopped" => Some(Self::Stopped),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Observable player state
///
/// `position` only moves for streams with a known duration; live streams
/// keep it wherever the last stream info left it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub state: PlaybackStatus,

    /// Seconds elapsed
    pub position: f64,

    /// 0.0 (silent) to 1.0 (full)
    pub volume: f64,

    pub is_live: bool,

    /// Seconds, unknown for live streams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            state: PlaybackStatus::Stopped,
            position: 0.0,
            volume: 1.0,
            is_live: true,
            duration: None,
        }
    }
}

/// One rendition a stream can be played at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamQuality {
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framerate: Option<f64>,
    /// Bits per second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u64>,
}

/// Technical description of the stream currently loaded by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInfo {
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub position: f64,
    #[serde(default)]
    pub video_codec: Option<String>,
    #[serde(default)]
    pub audio_codec: Option<String>,
    /// Free-form, usually `WxH`
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub bitrate: Option<u64>,
    #[serde(default)]
    pub qualities: Vec<StreamQuality>,
}

impl StreamInfo {
    /// A stream without a positive duration is treated as live
    pub fn is_live(&self) -> bool {
        !matches!(self.duration, Some(d) if d > 0.0)
    }
}
