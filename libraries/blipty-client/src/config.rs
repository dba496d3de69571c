//! Client configuration
use crate::error::{ConfigError, Result};
use blipty_playback::{RetryConfig, SessionConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "blipty.toml";

/// Prefix of environment overrides, e.g. `BLIPTY_PLAYBACK__MAX_RETRIES=5`
pub const ENV_PREFIX: &str = "BLIPTY";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_logging")]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Overrides the detected device memory when sizing stream buffers
    #[serde(default)]
    pub device_memory_gb: Option<f64>,

    #[serde(default = "default_video_sink_id")]
    pub video_sink_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// `tracing` filter directive; `RUST_LOG` takes precedence
    #[serde(default)]
    pub filter: Option<String>,
}

impl ClientConfig {
    /// Load `blipty.toml` (if present) and `BLIPTY_*` environment overrides
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load from the given file (if present) and the environment
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::build(Some(path), environment())
    }

    pub(crate) fn build(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path.filter(|p| p.exists()) {
            tracing::debug!(path = %path.display(), "Reading configuration file");
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(env);

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.database_url must not be empty".to_string(),
            ));
        }

        if self.playback.base_delay_ms == 0 {
            return Err(ConfigError::Invalid(
                "playback.base_delay_ms must be greater than 0".to_string(),
            ));
        }

        if self.playback.max_delay_ms < self.playback.base_delay_ms {
            return Err(ConfigError::Invalid(
                "playback.max_delay_ms must not be below playback.base_delay_ms".to_string(),
            ));
        }

        if let Some(gb) = self.playback.device_memory_gb {
            if !gb.is_finite() || gb <= 0.0 {
                return Err(ConfigError::Invalid(
                    "playback.device_memory_gb must be a positive number".to_string(),
                ));
            }
        }

        if self.playback.video_sink_id.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "playback.video_sink_id must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.playback.max_retries,
            base_delay: Duration::from_millis(self.playback.base_delay_ms),
            max_delay: Duration::from_millis(self.playback.max_delay_ms),
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            video_sink_id: self.playback.video_sink_id.clone(),
            retry: self.retry_config(),
            device_memory_gb: self.playback.device_memory_gb,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            playback: default_playback(),
            logging: default_logging(),
        }
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

// Default value functions
fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        max_retries: default_max_retries(),
        base_delay_ms: default_base_delay_ms(),
        max_delay_ms: default_max_delay_ms(),
        device_memory_gb: None,
        video_sink_id: default_video_sink_id(),
    }
}

fn default_logging() -> LoggingSettings {
    LoggingSettings::default()
}

fn default_database_url() -> String {
    "sqlite://blipty.db".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_video_sink_id() -> String {
    "video-player".to_string()
}
