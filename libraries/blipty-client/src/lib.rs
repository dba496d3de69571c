//! Blipty Client
//!
//! The layer front ends talk to.
//!
//! # Features
//!
//! - **Library**: playlist CRUD, channel listing with on-demand provider
//!   population, channel selection, categories and favorites
//! - **Configuration**: `blipty.toml` plus `BLIPTY_*` environment overrides
//! - **Context**: one explicitly constructed [`AppContext`] owning the
//!   library, the player store and its push-event subscription
//!
//! # Example
//!
//! ```ignore
//! use blipty_client::{AppContext, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::load()?;
//!     let context = AppContext::start(config, library_backend, player_backend)?;
//!
//!     for playlist in context.library().get_playlists().await? {
//!         let channels = context.library().fetch_channels(playlist.id.unwrap()).await?;
//!         println!("{}: {} channels", playlist.name, channels.len());
//!     }
//!
//!     context.shutdown().await;
//!     Ok(())
//! }
//! ```

mod config;
mod context;
mod error;
mod library;

pub use config::{
    ClientConfig, LoggingSettings, PlaybackSettings, StorageSettings, DEFAULT_CONFIG_FILE,
    ENV_PREFIX,
};
pub use context::AppContext;
pub use error::{ConfigError, Result};
pub use library::Library;
