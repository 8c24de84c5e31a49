use clap::Parser;
use tracing_subscriber::EnvFilter;

use hometask_api::cli::{self, Cli};
use hometask_api::{config, is_development};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let default_filter = if is_development!() { "hometask_api=debug,tower_http=debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    let config = config::config();
    tracing::info!("Starting Home Task API in {:?} mode", config.environment);

    cli::run(Cli::parse(), config).await
}
