//! Seams to the stream transport and the video renderer
//!
//! The session never talks to a demuxer or a video widget directly. A
//! platform provides a [`TransportFactory`] that builds mpeg-ts transports
//! and a [`RenderHost`] that hands out renderers bound to video sinks.

use crate::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Settings a transport is created with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub url: String,
    pub is_live: bool,
    pub enable_stash_buffer: bool,
    pub live_buffer_latency_chasing: bool,
    pub live_sync: bool,
    pub lazy_load: bool,
    /// Initial stash size in bytes
    pub stash_initial_size: usize,
}

impl TransportConfig {
    /// Low-latency live configuration
    pub fn live(url: impl Into<String>, stash_initial_size: usize) -> Self {
        Self {
            url: url.into(),
            is_live: true,
            enable_stash_buffer: false,
            live_buffer_latency_chasing: true,
            live_sync: true,
            lazy_load: false,
            stash_initial_size,
        }
    }
}

/// Periodic transfer statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportStatistics {
    /// Download speed in KB/s
    pub speed: f64,
}

impl TransportStatistics {
    /// No data is arriving; a speed that is not a positive number counts as none
    pub fn is_stalled(&self) -> bool {
        !self.speed.is_finite() || self.speed <= 0.0
    }
}

/// Notifications a transport sends to its session
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Error { kind: String, detail: String },
    Statistics(TransportStatistics),
}

/// Opaque handle to the media element a renderer draws into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaElement(pub String);

/// A live stream pipeline bound to one URL
#[async_trait]
pub trait Transport: Send {
    fn attach_media_element(&mut self, element: MediaElement);

    async fn load(&mut self) -> Result<()>;

    async fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    fn unload(&mut self);

    fn detach_media_element(&mut self);

    fn destroy(&mut self);
}

/// Builds transports
pub trait TransportFactory: Send + Sync {
    /// Whether the platform can play live mpeg-ts at all
    fn live_playback_supported(&self) -> bool;

    /// Create a transport that reports through `events`
    ///
    /// The sender is dropped with the transport; events sent after the
    /// session moved on are discarded.
    fn create(
        &self,
        config: TransportConfig,
        events: mpsc::UnboundedSender<TransportEvent>,
    ) -> Box<dyn Transport>;
}

/// Renderer options applied once at initialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererOptions {
    pub autoplay: bool,
    pub controls: bool,
    pub preload: String,
    pub fluid: bool,
    pub live_tracker: bool,
    pub live_ui: bool,
}

impl RendererOptions {
    /// Options for a live channel player
    pub fn live() -> Self {
        Self {
            autoplay: true,
            controls: true,
            preload: "auto".to_string(),
            fluid: true,
            live_tracker: true,
            live_ui: true,
        }
    }
}

/// A video widget bound to one sink
pub trait Renderer: Send {
    fn configure(&mut self, options: &RendererOptions);

    fn media_element(&self) -> MediaElement;

    fn pause(&mut self);

    fn reset(&mut self);

    fn dispose(&mut self);
}

/// Looks up video sinks by identifier
pub trait RenderHost: Send + Sync {
    fn locate(&self, sink_id: &str) -> Option<Box<dyn Renderer>>;
}
