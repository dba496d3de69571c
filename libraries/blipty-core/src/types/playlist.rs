//! Playlist domain types

use serde::{Deserialize, Serialize};

pub type PlaylistId = i64;

/// An IPTV provider account the user has registered.
///
/// The identifier is assigned by the backend; records built on the client
/// side carry `None` until they have been stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(default)]
    pub id: Option<PlaylistId>,
    pub name: String,
    pub server_url: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub epg_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Playlist {
    /// Create an active, not yet stored playlist
    pub fn new(
        name: impl Into<String>,
        server_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            server_url: server_url.into(),
            username: username.into(),
            password: password.into(),
            epg_url: None,
            created_at: None,
            updated_at: None,
            last_updated: None,
            is_active: true,
        }
    }

    /// Server URL with surrounding whitespace and one trailing slash removed
    ///
    /// Providers are addressed as `{server}/player_api.php`, so a trailing
    /// slash would produce a double separator.
    pub fn normalized_server_url(&self) -> String {
        let trimmed = self.server_url.trim();
        trimmed.strip_suffix('/').unwrap_or(trimmed).to_string()
    }
}
