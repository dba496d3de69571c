//! Blipty Core
//!
//! Platform-agnostic types, backend traits, and error handling for Blipty,
//! an IPTV playlist manager and live-stream player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Playlist`, `Channel`, `Favorite`, `PlayerState`, `StreamInfo`, etc.
//! - **Backend Traits**: `LibraryBackend` (persistence) and `PlayerBackend` (playback)
//! - **Error Handling**: Unified `BliptyError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use blipty_core::types::{Playlist, PlayerState, PlaybackStatus};
//!
//! let playlist = Playlist::new("Home", "http://provider.example:8080/", "user", "secret");
//! assert_eq!(playlist.normalized_server_url(), "http://provider.example:8080");
//!
//! let state = PlayerState::default();
//! assert_eq!(state.state, PlaybackStatus::Stopped);
//! ```

#![forbid(unsafe_code)]

pub mod backend;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use backend::{LibraryBackend, PlayerBackend};
pub use error::{BliptyError, Result};

pub use types::{
    Category, Channel, ChannelId, Favorite, NewChannel, NewFavorite, PlaybackStatus,
    PlayerErrorInfo, PlayerEvent, PlayerState, Playlist, PlaylistId, StreamInfo, StreamQuality,
    PLAYER_EVENT_CHANNEL,
};
