//! Xtream Codes payload extraction
//!
//! Providers answer in two shapes:
//!
//! - `panel_api.php`: one object with `categories.{live,movie,series}` arrays
//!   and an `available_channels` map keyed by stream id
//! - `player_api.php`: plain arrays, one request for categories and one for
//!   streams
//!
//! Ids arrive as strings or numbers depending on the panel.

use blipty_core::{Category, NewChannel, Playlist};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const PANEL_SECTIONS: [&str; 3] = ["live", "movie", "series"];

/// Categories of either payload shape, ordered by id
///
/// Entries without a numeric `category_id` or a name are skipped. A later
/// entry with the same id replaces an earlier one.
pub fn extract_categories(data: &Value) -> Vec<Category> {
    let mut found = BTreeMap::new();

    if let Some(sections) = data.get("categories").and_then(Value::as_object) {
        for content_type in PANEL_SECTIONS {
            let entries = sections.get(content_type).and_then(Value::as_array);
            for entry in entries.into_iter().flatten() {
                if let Some(category) = to_category(entry, content_type) {
                    found.insert(category.category_id, category);
                }
            }
        }
    } else if let Some(entries) = data.as_array() {
        for entry in entries {
            if let Some(category) = to_category(entry, "live") {
                found.insert(category.category_id, category);
            }
        }
    }

    tracing::debug!(categories = found.len(), "Extracted Xtream categories");
    found.into_values().collect()
}

/// Channels of either payload shape
///
/// `stream_type` fills in entries that carry none. Category names are taken
/// from `categories`; a channel whose category is unknown keeps its
/// `category_id` without a name. Entries without a stream id are skipped.
/// Without a `stream_url` the provider's live path is built from the
/// playlist's server and credentials.
pub fn extract_channels(
    data: &Value,
    stream_type: &str,
    categories: &[Category],
    playlist: &Playlist,
) -> Vec<NewChannel> {
    let names: BTreeMap<String, &str> = categories
        .iter()
        .map(|c| (c.category_id.to_string(), c.name.as_str()))
        .collect();
    let server = playlist.normalized_server_url();

    let build = |entry: &Map<String, Value>, stream_id: String| {
        let category_id = entry.get("category_id").and_then(id_string);
        let category_name = category_id
            .as_ref()
            .and_then(|id| names.get(id))
            .map(|name| (*name).to_string());

        let stream_url = text(entry, "stream_url")
            .or_else(|| text(entry, "stream"))
            .unwrap_or_else(|| {
                format!(
                    "{server}/live/{}/{}/{stream_id}.ts",
                    playlist.username, playlist.password
                )
            });

        NewChannel {
            name: text(entry, "name")
                .or_else(|| text(entry, "title"))
                .unwrap_or_else(|| "Unknown Channel".to_string()),
            stream_type: text(entry, "stream_type").unwrap_or_else(|| stream_type.to_string()),
            stream_url,
            category_id,
            category_name,
            authenticated_stream_url: None,
            stream_icon: text(entry, "stream_icon"),
            epg_channel_id: text(entry, "epg_channel_id"),
            stream_id,
        }
    };

    let mut channels = Vec::new();

    if let Some(available) = data.get("available_channels").and_then(Value::as_object) {
        for (key, entry) in available {
            if let Some(entry) = entry.as_object() {
                channels.push(build(entry, key.clone()));
            }
        }
    } else if let Some(entries) = data.as_array() {
        for entry in entries.iter().filter_map(Value::as_object) {
            let stream_id = entry
                .get("stream_id")
                .and_then(id_string)
                .or_else(|| entry.get("num").and_then(id_string));
            match stream_id {
                Some(stream_id) => channels.push(build(entry, stream_id)),
                None => tracing::warn!("Skipping Xtream stream without an id"),
            }
        }
    }

    tracing::debug!(channels = channels.len(), "Extracted Xtream channels");
    channels
}

fn to_category(entry: &Value, content_type: &str) -> Option<Category> {
    let category_id = entry
        .get("category_id")
        .and_then(id_string)?
        .parse::<i64>()
        .ok()?;
    let name = entry.get("category_name").and_then(Value::as_str)?;

    Some(Category {
        id: None,
        category_id,
        name: name.to_string(),
        content_type: content_type.to_string(),
        parent_id: entry.get("parent_id").and_then(Value::as_i64),
    })
}

/// A string or integer id as text
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => n.as_i64().map(|n| n.to_string()),
        _ => None,
    }
}

fn text(entry: &Map<String, Value>, key: &str) -> Option<String> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
