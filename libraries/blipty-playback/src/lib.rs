//! Blipty - Live Stream Playback
//!
//! This crate provides:
//! - A retry policy with capped exponential backoff
//! - The playback session: binds a live mpeg-ts transport to a video sink,
//!   reloads on transport errors and stalls
//! - The player store: observable player state driven by commands and
//!   backend push-events
//! - Labels for stream quality and stream info
//!
//! # Architecture
//!
//! `blipty-playback` never touches a demuxer, a video widget or a database.
//! Platforms plug in through traits:
//! - [`TransportFactory`] / [`Transport`] for the stream pipeline
//! - [`RenderHost`] / [`Renderer`] for the video sink
//! - [`blipty_core::PlayerBackend`] for the native player commands
//!
//! # Example: Formatting
//!
//! ```rust
//! use blipty_playback::format::{format_bitrate, format_duration, format_resolution};
//!
//! assert_eq!(format_bitrate(Some(1_500_000)), "1.5 Mbps");
//! assert_eq!(format_resolution(1920, 1080), "1080p");
//! assert_eq!(format_duration(3661.0), "1:01:01");
//! ```
//!
//! # Example: Retry policy
//!
//! ```rust
//! use blipty_playback::RetryStrategy;
//! use std::time::Duration;
//!
//! let mut retry = RetryStrategy::default();
//! assert_eq!(retry.delay(), Duration::from_secs(1));
//!
//! retry.increment();
//! assert_eq!(retry.delay(), Duration::from_secs(2));
//! assert!(retry.should_retry());
//! ```

pub mod buffer;
pub mod error;
pub mod format;
pub mod retry;
pub mod session;
pub mod store;
pub mod transport;

pub use buffer::calculate_buffer_size;
pub use error::{PlaybackError, Result};
pub use retry::{RetryConfig, RetryStrategy};
pub use session::{
    Activity, PlaybackSession, ReloadCause, SessionConfig, SessionHandle, SessionStatus,
};
pub use store::{EventSubscription, PlayerStore};
pub use transport::{
    MediaElement, RenderHost, Renderer, RendererOptions, Transport, TransportConfig,
    TransportEvent, TransportFactory, TransportStatistics,
};
