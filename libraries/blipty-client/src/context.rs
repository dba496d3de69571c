//! Application context
//!
//! Built once at startup and handed to whatever needs the library or the
//! player. Nothing in Blipty is a global.

use crate::config::ClientConfig;
use crate::library::Library;
use blipty_core::{LibraryBackend, PlayerBackend};
use blipty_playback::{
    EventSubscription, PlaybackSession, PlayerStore, RenderHost, TransportFactory,
};
use std::sync::Arc;
use tracing::{debug, info};

pub struct AppContext {
    config: ClientConfig,
    library: Library,
    player: Arc<PlayerStore>,
    events: Option<EventSubscription>,
}

impl AppContext {
    /// Wire up the library and the player store and start listening to
    /// player push-events
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        config: ClientConfig,
        library: Arc<dyn LibraryBackend>,
        player: Arc<dyn PlayerBackend>,
    ) -> blipty_playback::Result<Self> {
        let player = Arc::new(PlayerStore::new(player));
        let events = player.listen()?;

        info!("Application context started");

        Ok(Self {
            config,
            library: Library::new(library),
            player,
            events: Some(events),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn player(&self) -> &Arc<PlayerStore> {
        &self.player
    }

    /// A playback session sharing this context's player store
    pub fn playback_session(
        &self,
        host: Arc<dyn RenderHost>,
        factory: Arc<dyn TransportFactory>,
    ) -> PlaybackSession {
        PlaybackSession::new(
            self.config.session_config(),
            host,
            factory,
            Arc::clone(&self.player),
        )
    }

    /// Stop listening to player events and reset the player state
    pub async fn shutdown(mut self) {
        if let Some(events) = self.events.take() {
            events.release().await;
        }
        self.player.reset();
        debug!("Application context shut down");
    }
}
