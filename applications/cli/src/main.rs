//! Blipty - IPTV playlist manager
use anyhow::Context;
use blipty_client::{ClientConfig, Library};
use blipty_cli::{Cli, Format, Runner};
use blipty_storage::LocalLibrary;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    }
    .context("failed to load configuration")?;

    if let Some(url) = cli.database.clone() {
        config.storage.database_url = url;
    }

    // Initialize tracing
    let default_filter = config
        .logging
        .filter
        .clone()
        .unwrap_or_else(|| "blipty=info".to_string());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Initialize database
    let pool = blipty_storage::create_pool(&config.storage.database_url).await?;
    let local = LocalLibrary::new(pool);
    let library = Library::new(Arc::new(local.clone()));
    library.initialize_database().await?;
    tracing::debug!(url = %config.storage.database_url, "Database ready");

    let format = if cli.json { Format::Json } else { Format::Text };
    let mut runner = Runner::new(&library, &local, format, std::io::stdout().lock());
    runner.run(cli.command).await?;

    local.pool().close().await;
    Ok(())
}
