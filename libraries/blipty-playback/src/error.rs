//! Error types for playback

use blipty_core::BliptyError;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The configured video sink does not exist
    #[error("Video sink not found: {0}")]
    SinkNotFound(String),

    /// The transport cannot play live streams on this platform
    #[error("Live playback is not supported by the stream transport")]
    LivePlaybackUnsupported,

    /// `load` was called before `initialize`
    #[error("Playback session not initialized")]
    NotInitialized,

    /// The stream transport failed to load or play
    #[error("Transport error: {0}")]
    Transport(String),

    /// Transport errors kept recurring after every retry
    #[error("Failed to play stream after multiple attempts ({attempts} retries)")]
    RetriesExhausted { attempts: u32 },

    /// The session task has stopped
    #[error("Playback session closed")]
    SessionClosed,

    /// Another event subscription is still active
    #[error("Player events are already being listened to")]
    AlreadyListening,

    /// Invalid argument to a player command
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The player backend rejected a command
    #[error(transparent)]
    Backend(#[from] BliptyError),
}

impl PlaybackError {
    /// Whether this error came from `initialize`
    pub fn is_initialization_error(&self) -> bool {
        matches!(self, Self::SinkNotFound(_) | Self::LivePlaybackUnsupported)
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
