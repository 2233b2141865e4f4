//! Guildboard server binary.
//!
//! Wires together the persisted store, the persistence task, and the
//! realtime gateway. Loads configuration, restores state from the
//! durability file, and serves until the process is terminated.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from the environment
//! 3. Restore the board from the durability file (tolerant load)
//! 4. Spawn the persistence task (debounce + heartbeat)
//! 5. Build the shared application state
//! 6. Serve

mod config;
mod error;

use std::path::PathBuf;
use std::sync::Arc;

use guildboard_server::{AppState, ServerConfig, start_server};
use guildboard_store::{BoardStore, FileSink, PersistConfig, load_document, run_persistence};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::AppError;

/// Application entry point for the board server.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the server fails to
/// bind or serve.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("guildboard starting");

    // 2. Load configuration.
    let config = AppConfig::from_env()?;
    info!(
        host = config.host,
        port = config.port,
        data_file = config.data_file,
        "Configuration loaded"
    );

    // 3. Restore the board from the durability file.
    let data_path = PathBuf::from(&config.data_file);
    let document = load_document(&data_path);
    info!(
        quests = document.quests.len(),
        markers = document.markers.len(),
        categories = document.custom_categories.len(),
        total_connections = document.analytics.total_connections,
        "Board restored"
    );
    let store = Arc::new(BoardStore::from_document(document));

    // 4. Spawn the persistence task.
    let persist_config = PersistConfig {
        debounce: config.save_debounce,
        heartbeat: config.save_interval,
    };
    tokio::spawn(run_persistence(
        Arc::clone(&store),
        FileSink::new(data_path),
        persist_config,
    ));
    info!("Persistence task started");

    // 5. Build the shared application state.
    let state = Arc::new(AppState::new(store));

    // 6. Serve.
    let server_config = ServerConfig {
        host: config.host,
        port: config.port,
    };
    start_server(&server_config, state).await?;

    Ok(())
}
