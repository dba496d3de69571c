//! Command handlers
//!
//! Handlers write to any `io::Write` so they can be tested against a buffer.

use crate::cli::{ChannelCommand, Command, FavoriteCommand, ImportFormat, PlaylistCommand};
use anyhow::{bail, Context};
use blipty_client::Library;
use blipty_core::{BliptyError, Channel, NewChannel, NewFavorite, Playlist};
use blipty_storage::LocalLibrary;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::io::Write;
use std::path::Path;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

pub struct Runner<'a, W: Write> {
    library: &'a Library,
    local: &'a LocalLibrary,
    format: Format,
    out: W,
}

impl<'a, W: Write> Runner<'a, W> {
    pub fn new(library: &'a Library, local: &'a LocalLibrary, format: Format, out: W) -> Self {
        Self {
            library,
            local,
            format,
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub async fn run(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Playlists(command) => self.playlists(command).await,
            Command::Channels(command) => self.channels(command).await,
            Command::Categories { playlist_id } => {
                let categories = self.library.get_categories(playlist_id).await?;
                self.print(&categories, |c| {
                    format!("{}\t{}\t{}", c.category_id, c.name, c.content_type)
                })
            }
            Command::Select {
                playlist_id,
                channel_id,
            } => {
                self.library
                    .set_selected_channel(playlist_id, channel_id)
                    .await?;
                self.message(&format!("Selected channel {channel_id}"))
            }
            Command::Selected { playlist_id } => {
                match self.library.get_selected_channel(playlist_id).await? {
                    Some(channel) => self.print(&[channel], channel_line),
                    None => self.message("No channel selected"),
                }
            }
            Command::Favorites(command) => self.favorites(command).await,
        }
    }

    async fn playlists(&mut self, command: PlaylistCommand) -> anyhow::Result<()> {
        match command {
            PlaylistCommand::List => {
                let playlists = self.library.get_playlists().await?;
                self.print(&playlists, |p| {
                    format!(
                        "{}\t{}\t{}\t{}",
                        p.id.unwrap_or_default(),
                        p.name,
                        p.normalized_server_url(),
                        if p.is_active { "active" } else { "inactive" }
                    )
                })
            }
            PlaylistCommand::Add {
                name,
                server,
                username,
                password,
                epg,
            } => {
                let mut playlist = Playlist::new(name, server, username, password);
                playlist.epg_url = epg;
                let id = self.library.add_playlist(&playlist).await?;
                self.message(&format!("Added playlist {id}"))
            }
            PlaylistCommand::Update {
                id,
                name,
                server,
                username,
                password,
                epg,
                active,
            } => {
                let mut playlist = self
                    .library
                    .get_playlists()
                    .await?
                    .into_iter()
                    .find(|p| p.id == Some(id))
                    .ok_or_else(|| BliptyError::not_found("Playlist", id))?;

                if let Some(name) = name {
                    playlist.name = name;
                }
                if let Some(server) = server {
                    playlist.server_url = server;
                }
                if let Some(username) = username {
                    playlist.username = username;
                }
                if let Some(password) = password {
                    playlist.password = password;
                }
                if epg.is_some() {
                    playlist.epg_url = epg;
                }
                if let Some(active) = active {
                    playlist.is_active = active;
                }

                self.library.update_playlist(id, &playlist).await?;
                self.message(&format!("Updated playlist {id}"))
            }
            PlaylistCommand::Delete { id } => {
                self.library.delete_playlist(id).await?;
                self.message(&format!("Deleted playlist {id}"))
            }
        }
    }

    async fn channels(&mut self, command: ChannelCommand) -> anyhow::Result<()> {
        match command {
            ChannelCommand::List {
                playlist_id,
                category,
            } => {
                let channels = match self.library.fetch_channels(playlist_id).await {
                    Ok(channels) => channels,
                    Err(BliptyError::Unsupported(_)) => {
                        return self.message(
                            "No channels stored for this playlist; add them with `blipty channels import`",
                        );
                    }
                    Err(e) => return Err(e.into()),
                };
                let channels: Vec<Channel> = channels
                    .into_iter()
                    .filter(|c| {
                        category
                            .as_deref()
                            .map_or(true, |wanted| c.category_name.as_deref() == Some(wanted))
                    })
                    .collect();
                self.print(&channels, channel_line)
            }
            ChannelCommand::Import {
                playlist_id,
                file,
                format,
                categories,
                stream_type,
            } => {
                let written = match format {
                    ImportFormat::Channels => {
                        let channels: Vec<NewChannel> = read_json(&file)?;
                        self.local.import_channels(playlist_id, &channels).await?
                    }
                    ImportFormat::M3u => {
                        let content = read_text(&file)?;
                        self.local.import_m3u(playlist_id, &content).await?
                    }
                    ImportFormat::Xtream => {
                        let streams: Value = read_json(&file)?;
                        let categories: Option<Value> =
                            categories.as_deref().map(read_json).transpose()?;
                        self.local
                            .import_xtream(playlist_id, &streams, categories.as_ref(), &stream_type)
                            .await?
                    }
                };
                self.message(&format!("Imported {written} channels"))
            }
        }
    }

    async fn favorites(&mut self, command: FavoriteCommand) -> anyhow::Result<()> {
        match command {
            FavoriteCommand::List { playlist_id } => {
                let favorites = self.library.get_favorites(playlist_id).await?;
                self.print(&favorites, |f| {
                    format!("{}\t{}\t{}", f.stream_id, f.content_type, f.created_at)
                })
            }
            FavoriteCommand::Add {
                playlist_id,
                stream_id,
                content_type,
            } => {
                let favorite = self
                    .library
                    .add_favorite(&NewFavorite {
                        playlist_id,
                        stream_id,
                        content_type,
                    })
                    .await?;
                self.message(&format!("Pinned stream {}", favorite.stream_id))
            }
            FavoriteCommand::Remove {
                playlist_id,
                stream_id,
            } => {
                if !self.library.remove_favorite(playlist_id, &stream_id).await? {
                    bail!("stream {stream_id} is not a favorite of playlist {playlist_id}");
                }
                self.message(&format!("Unpinned stream {stream_id}"))
            }
        }
    }

    fn print<T: Serialize>(&mut self, items: &[T], line: impl Fn(&T) -> String) -> anyhow::Result<()> {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut self.out, items)?;
                writeln!(self.out)?;
            }
            Format::Text => {
                for item in items {
                    writeln!(self.out, "{}", line(item))?;
                }
            }
        }
        Ok(())
    }

    fn message(&mut self, text: &str) -> anyhow::Result<()> {
        match self.format {
            Format::Json => writeln!(self.out, "{}", serde_json::json!({ "message": text }))?,
            Format::Text => writeln!(self.out, "{text}")?,
        }
        Ok(())
    }
}

fn channel_line(channel: &Channel) -> String {
    format!(
        "{}\t{}\t{}\t{}{}",
        channel.id.unwrap_or_default(),
        channel.stream_id,
        channel.name,
        channel.category_name.as_deref().unwrap_or("-"),
        if channel.is_selected { "\t*" } else { "" }
    )
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let data = read_text(path)?;
    serde_json::from_str(&data).with_context(|| format!("invalid JSON in {}", path.display()))
}
