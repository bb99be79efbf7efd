//! Cardtable command-line client.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod catalog;
mod command;
mod config;
mod connection;
mod protocol;
mod session;

use config::ClientConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env()?;
    if let Some(count) = config.catalog.len() {
        info!("Loaded {} card names", count);
    }

    info!(
        "Joining {} as {} (#{})",
        config.server_url, config.player_name, config.player_id
    );

    connection::run(config).await
}
