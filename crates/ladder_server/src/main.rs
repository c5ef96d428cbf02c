//! Tic-tac-toe ladder - unified CLI
//!
//! Serves the match engine over HTTP or inspects the leaderboard.

#![warn(missing_docs)]

mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use ladder_server::{MatchEngine, Reply, Scores, ServerConfig, SqliteStore};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            database_url,
        } => run_server(config, host, port, database_url).await,
        Command::Leaderboard { database_url, max } => print_leaderboard(database_url, max),
    }
}

/// Run the HTTP server
#[instrument(skip_all)]
async fn run_server(
    config: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    database_url: Option<String>,
) -> Result<()> {
    let mut config = ServerConfig::load(config.as_deref())?;
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(database_url) = database_url {
        config = config.with_database_url(database_url);
    }

    info!(database_url = %config.database_url(), "Opening store");
    let store = SqliteStore::open(config.database_url().clone(), *config.busy_timeout_ms())?;
    let app = ladder_server::router(Arc::new(MatchEngine::new(store)));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Server ready at http://{}/", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Print the leaderboard to stdout
#[instrument]
fn print_leaderboard(database_url: String, max: u32) -> Result<()> {
    let store = SqliteStore::open(database_url, *ServerConfig::default().busy_timeout_ms())?;
    let standings = MatchEngine::new(store).leaderboard(max)?;
    let reply = Reply::Ok(Scores::new(standings));
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
