//! Startup orchestration.
//!
//! # Responsibilities
//! - Parse the command line and load configuration
//! - Initialize logging and metrics
//! - Open the production store (and the backup store in updater mode)
//! - Either run one reload and exit, or serve HTTP until shutdown
//!
//! # Design Decisions
//! - Fail fast: config, logging and store errors are fatal
//! - A failed reload is logged, not fatal; the updater always exits cleanly
//! - Listeners start last (traffic only when ready)

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::catalog::Catalog;
use crate::config::{load_or_default, ApiConfig, ConfigError};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::logging::{self, LoggingError};
use crate::observability::metrics;
use crate::query::QueryEngine;
use crate::store::{MemoryStore, StoreError};
use crate::updater::Updater;

/// Command line of the `arma-api` binary.
#[derive(Debug, Parser)]
#[command(name = "arma-api")]
#[command(about = "Read-only query API over mod configuration items", long_about = None)]
pub struct Cli {
    /// Path to a TOML config file; defaults apply when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Reload the store from the source directory, then exit.
    #[arg(long)]
    pub updater: bool,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the process described by `cli`.
pub async fn run(cli: Cli) -> Result<(), StartupError> {
    let config = load_or_default(cli.config.as_deref())?;
    logging::init(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        mode = if cli.updater { "updater" } else { "server" },
        "arma-api starting"
    );
    tracing::info!(
        bind_address = %config.listener.bind_address,
        data_dir = %config.store.data_dir.display(),
        database = %config.store.database,
        mods = config.catalog.supported_mods.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let production = Arc::new(open_store(&config, &config.store.database)?);

    if cli.updater {
        let backup = Arc::new(open_store(&config, &config.store.backup_database())?);
        run_updater(&config, production, backup).await;
        return Ok(());
    }

    serve(config, production).await
}

fn open_store(config: &ApiConfig, database: &str) -> Result<MemoryStore, StoreError> {
    match MemoryStore::open(&config.store.data_dir, database) {
        Ok(store) => {
            tracing::info!(database, "Connected to store");
            Ok(store)
        }
        Err(e) => {
            tracing::error!(database, error = %e, "Could not connect to store");
            Err(e)
        }
    }
}

async fn run_updater(config: &ApiConfig, production: Arc<MemoryStore>, backup: Arc<MemoryStore>) {
    let updater = Updater::new(production, backup, config.updater.source_dir.clone());
    tracing::info!(source_dir = %updater.source_dir().display(), "Starting reload");

    match tokio::task::spawn_blocking(move || updater.run()).await {
        Ok(Ok(report)) if report.success => tracing::info!(
            inserted = report.inserted(),
            files = report.files.len(),
            backed_up = report.backed_up.len(),
            "Successfully updated the database"
        ),
        Ok(Ok(report)) => {
            let failed: Vec<String> = report
                .failed_files()
                .map(|p| p.display().to_string())
                .collect();
            tracing::error!(
                inserted = report.inserted(),
                failed = ?failed,
                "Unable to fully update the database"
            );
        }
        Ok(Err(e)) => tracing::error!(error = %e, "Reload aborted"),
        Err(e) => tracing::error!(error = %e, "Reload task panicked"),
    }
}

async fn serve(config: ApiConfig, production: Arc<MemoryStore>) -> Result<(), StartupError> {
    let catalog = Catalog::new(config.catalog.supported_mods.clone());
    let engine = Arc::new(QueryEngine::new(production.clone(), catalog));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    if config.store.refresh_secs > 0 {
        spawn_snapshot_refresh(
            production,
            Duration::from_secs(config.store.refresh_secs),
            shutdown.subscribe(),
        );
    }
    shutdown.trigger_on_signal();

    HttpServer::new(config, engine).run(listener, receiver).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Periodically pick up a snapshot rewritten by an `--updater` run.
pub fn spawn_snapshot_refresh(
    store: Arc<MemoryStore>,
    period: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let refresh = store.clone();
                    match tokio::task::spawn_blocking(move || refresh.refresh()).await {
                        Ok(Ok(_)) => {}
                        Ok(Err(e)) => tracing::warn!(error = %e, "Could not reload database snapshot"),
                        Err(e) => tracing::error!(error = %e, "Snapshot reload task panicked"),
                    }
                }
                _ = shutdown.recv() => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Document, DocumentStore};
    use serde_json::json;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["arma-api"]);
        assert!(cli.config.is_none());
        assert!(!cli.updater);
    }

    #[test]
    fn test_cli_updater_flag() {
        let cli = Cli::parse_from(["arma-api", "--config", "api.toml", "--updater"]);
        assert_eq!(cli.config, Some(PathBuf::from("api.toml")));
        assert!(cli.updater);
    }

    #[tokio::test]
    async fn test_snapshot_refresh_task_reloads_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        let served = Arc::new(MemoryStore::open(dir.path(), "arma-api").unwrap());

        let shutdown = Shutdown::new();
        let handle = spawn_snapshot_refresh(
            served.clone(),
            Duration::from_millis(10),
            shutdown.subscribe(),
        );

        let updater = MemoryStore::open(dir.path(), "arma-api").unwrap();
        let item = Document::try_from(json!({"type": "Maps", "mod": "vanilla"})).unwrap();
        updater.insert_one("data.vanilla", item).unwrap();
        updater.flush().unwrap();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while served.estimated_document_count("data.vanilla") == 0 {
            assert!(tokio::time::Instant::now() < deadline, "snapshot never reloaded");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
