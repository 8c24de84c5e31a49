use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::config::{AppConfig, StoreBackend};
use crate::database::{MemoryStore, PgStore, Store};
use crate::mail::{HttpMailer, LogMailer, Mailer};
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "hometask-api")]
#[command(about = "Home Task API - projects, tasks, teams and notes over HTTP")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on, overrides PORT")]
        port: Option<u16>,
    },

    #[command(about = "Create the Postgres tables if they do not exist")]
    Migrate,
}

pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => serve(config, port).await,
        Commands::Migrate => migrate(config).await,
    }
}

async fn serve(config: &AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    let errors = config.startup_errors();
    if !errors.is_empty() {
        anyhow::bail!("refusing to start: {}", errors.join("; "));
    }

    let store: Arc<dyn Store> = match config.database.backend {
        StoreBackend::Postgres => {
            let store = PgStore::connect(&config.database).await?;
            store.migrate().await.context("failed to prepare database schema")?;
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let mailer: Arc<dyn Mailer> = match &config.mail.relay_url {
        Some(url) => Arc::new(HttpMailer::new(url.clone(), config.mail.relay_api_key.clone())),
        None => Arc::new(LogMailer),
    };

    let state = AppState::new(store, mailer, Arc::new(config.clone()));
    let app = crate::routes::app(state);

    let bind_addr = format!("{}:{}", config.server.host, port.unwrap_or(config.server.port));
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Home Task API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn migrate(config: &AppConfig) -> anyhow::Result<()> {
    let store = PgStore::connect(&config.database).await?;
    store.migrate().await?;
    store.close().await;
    tracing::info!("Database schema is up to date");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
