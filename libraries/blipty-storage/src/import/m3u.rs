//! M3U / M3U8 playlist parsing
//!
//! Every `#EXTINF` line followed by a URL line becomes one live channel.
//! Channels get positional stream ids ("1", "2", ...) so re-importing the
//! same file updates them in place.

use blipty_core::{BliptyError, NewChannel, Result};
use std::collections::HashMap;

/// Category name for entries without a `group-title`
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Parsed M3U document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct M3uPlaylist {
    /// Guide URL from the header (`x-tvg-url` or `url-tvg`)
    pub epg_url: Option<String>,
    pub channels: Vec<NewChannel>,
}

/// Parse an M3U document
///
/// Fails with `InvalidInput` when the first line is not an `#EXTM3U` header.
pub fn parse_m3u(content: &str) -> Result<M3uPlaylist> {
    let content = content.trim_start_matches('\u{feff}').trim_start();
    let mut lines = content.lines();

    let Some(header) = lines
        .next()
        .and_then(|line| line.trim().strip_prefix("#EXTM3U"))
    else {
        return Err(BliptyError::invalid_input(
            "not an M3U playlist: missing #EXTM3U header",
        ));
    };

    let header_attrs = parse_attributes(header);
    let epg_url = header_attrs
        .get("x-tvg-url")
        .or_else(|| header_attrs.get("url-tvg"))
        .filter(|url| !url.is_empty())
        .cloned();

    let mut channels = Vec::new();
    let mut current: Option<(HashMap<String, String>, String)> = None;

    for line in lines {
        let line = line.trim();

        if let Some(info) = line.strip_prefix("#EXTINF:") {
            let (attrs, title) = split_extinf(info);
            current = Some((parse_attributes(attrs), title.to_string()));
        } else if line.is_empty() || line.starts_with('#') {
            continue;
        } else if let Some((attrs, title)) = current.take() {
            channels.push(to_channel(channels.len() + 1, attrs, title, line));
        }
    }

    tracing::debug!(channels = channels.len(), "Parsed M3U playlist");

    Ok(M3uPlaylist { epg_url, channels })
}

fn to_channel(
    position: usize,
    mut attrs: HashMap<String, String>,
    title: String,
    url: &str,
) -> NewChannel {
    let mut take = |key: &str| attrs.remove(key).filter(|value| !value.is_empty());

    let tvg_name = take("tvg-name");
    let name = if title.is_empty() {
        tvg_name.unwrap_or_else(|| "Unknown".to_string())
    } else {
        title
    };

    NewChannel {
        stream_id: position.to_string(),
        name,
        stream_type: "live".to_string(),
        stream_url: url.to_string(),
        category_id: None,
        category_name: Some(take("group-title").unwrap_or_else(|| UNCATEGORIZED.to_string())),
        authenticated_stream_url: None,
        stream_icon: take("tvg-logo"),
        epg_channel_id: take("tvg-id"),
    }
}

/// Split an `#EXTINF` body into its attribute part and the display title
///
/// The title starts after the first comma outside double quotes.
fn split_extinf(info: &str) -> (&str, &str) {
    let mut quoted = false;
    for (i, c) in info.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => return (&info[..i], info[i + 1..].trim()),
            _ => {}
        }
    }
    (info, "")
}

/// `key="value"` and `key=value` pairs, keys lowercased
///
/// A leading duration such as `-1` is skipped.
fn parse_attributes(text: &str) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    let mut rest = text
        .trim_start()
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '-' || c == '.');

    while let Some(eq) = rest.find('=') {
        let key = rest[..eq]
            .split_whitespace()
            .last()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let after = &rest[eq + 1..];

        let (value, remaining) = if let Some(quoted) = after.strip_prefix('"') {
            match quoted.find('"') {
                Some(end) => (&quoted[..end], &quoted[end + 1..]),
                None => (quoted, ""),
            }
        } else {
            match after.find(char::is_whitespace) {
                Some(end) => (&after[..end], &after[end..]),
                None => (after, ""),
            }
        };

        if !key.is_empty() {
            attrs.insert(key, value.trim().to_string());
        }
        rest = remaining;
    }

    attrs
}
