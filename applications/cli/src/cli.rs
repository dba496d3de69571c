//! Command-line definition
use blipty_core::{ChannelId, PlaylistId};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "blipty")]
#[command(about = "Manage IPTV playlists, channels and favorites", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "BLIPTY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database URL, overrides the configuration
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Print JSON instead of tab-separated lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage playlists
    #[command(subcommand)]
    Playlists(PlaylistCommand),

    /// List or import channels
    #[command(subcommand)]
    Channels(ChannelCommand),

    /// List the categories used by a playlist's channels
    Categories { playlist_id: PlaylistId },

    /// Select a channel of a playlist
    Select {
        playlist_id: PlaylistId,
        channel_id: ChannelId,
    },

    /// Show the selected channel of a playlist
    Selected { playlist_id: PlaylistId },

    /// Manage favorites
    #[command(subcommand)]
    Favorites(FavoriteCommand),
}

#[derive(Debug, Subcommand)]
pub enum PlaylistCommand {
    /// List all playlists
    List,

    /// Add a playlist
    Add {
        #[arg(short, long)]
        name: String,
        /// Provider URL, e.g. http://provider.example:8080
        #[arg(short, long)]
        server: String,
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        /// XMLTV guide URL
        #[arg(long)]
        epg: Option<String>,
    },

    /// Change fields of a playlist
    Update {
        id: PlaylistId,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        server: Option<String>,
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        password: Option<String>,
        #[arg(long)]
        epg: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete a playlist with its channels and favorites
    Delete { id: PlaylistId },
}

#[derive(Debug, Subcommand)]
pub enum ChannelCommand {
    /// List the channels of a playlist
    List {
        playlist_id: PlaylistId,
        /// Only channels of this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Import channels from a file
    Import {
        playlist_id: PlaylistId,
        file: PathBuf,
        #[arg(long, value_enum, default_value = "channels")]
        format: ImportFormat,
        /// Xtream categories response, when the streams file has none
        #[arg(long)]
        categories: Option<PathBuf>,
        /// Stream type for Xtream entries that carry none
        #[arg(long, default_value = "live")]
        stream_type: String,
    },
}

/// Layout of an import file
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImportFormat {
    /// JSON array of channel records
    Channels,
    /// M3U / M3U8 playlist
    M3u,
    /// Saved `panel_api.php` or `player_api.php` response
    Xtream,
}

#[derive(Debug, Subcommand)]
pub enum FavoriteCommand {
    /// List favorites of a playlist
    List { playlist_id: PlaylistId },

    /// Pin a stream
    Add {
        playlist_id: PlaylistId,
        stream_id: String,
        #[arg(long, default_value = "live")]
        content_type: String,
    },

    /// Unpin a stream
    Remove {
        playlist_id: PlaylistId,
        stream_id: String,
    },
}
