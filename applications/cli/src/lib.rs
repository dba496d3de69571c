//! Blipty command-line front end
//!
//! Works against the local SQLite store; provider fetching is left to the
//! native backend.

pub mod cli;
pub mod commands;

pub use cli::Cli;
pub use commands::{Format, Runner};
