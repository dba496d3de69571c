//! Blipty Storage
//!
//! Local `SQLite` fallback store for Blipty, used when the native command
//! backend is unavailable.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each entity (playlists, channels, categories,
//!   favorites) owns its own queries
//! - **Embedded Migrations**: The schema ships inside the binary
//! - **Offline Only**: The fallback store never talks to providers;
//!   `fetch_and_populate_data` reports `Unsupported`. Channels come in
//!   through [`import`]: M3U files and saved Xtream responses
//!
//! # Example
//!
//! ```rust,no_run
//! use blipty_storage::{LocalLibrary, create_pool, run_migrations};
//! use blipty_core::LibraryBackend;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://blipty.db").await?;
//! run_migrations(&pool).await?;
//!
//! let library = LocalLibrary::new(pool);
//! let playlists = library.get_playlists().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
pub mod import;

// Vertical slices
pub mod categories;
pub mod channels;
pub mod favorites;
pub mod playlists;

pub use context::LocalLibrary;
pub use error::{Result, StorageError};

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Safe to call on every start; already applied migrations are skipped.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    tracing::debug!("Database migrations applied");
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://blipty.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .create_if_missing(true)
        .foreign_keys(true) // favorites and channels cascade from playlists
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::info!(url = %database_url, "SQLite pool ready");

    Ok(pool)
}

/// Current time in the textual format stored in `TEXT` timestamp columns
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
