//! Parsers turning provider documents into channels and categories
//!
//! Pure functions; [`crate::LocalLibrary`] stores what they return.

mod m3u;
mod xtream;

pub use m3u::{parse_m3u, M3uPlaylist, UNCATEGORIZED};
pub use xtream::{extract_categories, extract_channels};
