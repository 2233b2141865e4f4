//! Configuration for the board server binary.
//!
//! All configuration is loaded from environment variables. Only `PORT` is
//! commonly set; everything else has a sensible default.

use std::time::Duration;

use crate::error::AppError;

/// Complete application configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host address to bind to.
    pub host: String,
    /// TCP port to listen on.
    pub port: u16,
    /// Path of the durability file.
    pub data_file: String,
    /// Quiet period after the last mutation before a debounced save.
    pub save_debounce: Duration,
    /// Interval of the unconditional heartbeat save.
    pub save_interval: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables:
    /// - `PORT` -- listening port (default 3000)
    /// - `HOST` -- bind address (default `0.0.0.0`)
    /// - `DATA_FILE` -- durability file path (default `guildboard-data.json`)
    /// - `SAVE_DEBOUNCE_MS` -- save quiet period in milliseconds (default 1000)
    /// - `SAVE_INTERVAL_SECS` -- heartbeat save interval in seconds (default 10)
    pub fn from_env() -> Result<Self, AppError> {
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| String::from("3000"))
            .parse()
            .map_err(|e| AppError::Config(format!("invalid PORT: {e}")))?;

        let host = std::env::var("HOST").unwrap_or_else(|_| String::from("0.0.0.0"));

        let data_file =
            std::env::var("DATA_FILE").unwrap_or_else(|_| String::from("guildboard-data.json"));

        let save_debounce_ms: u64 = std::env::var("SAVE_DEBOUNCE_MS")
            .unwrap_or_else(|_| String::from("1000"))
            .parse()
            .map_err(|e| AppError::Config(format!("invalid SAVE_DEBOUNCE_MS: {e}")))?;

        let save_interval_secs: u64 = std::env::var("SAVE_INTERVAL_SECS")
            .unwrap_or_else(|_| String::from("10"))
            .parse()
            .map_err(|e| AppError::Config(format!("invalid SAVE_INTERVAL_SECS: {e}")))?;

        Ok(Self {
            host,
            port,
            data_file,
            save_debounce: Duration::from_millis(save_debounce_ms),
            save_interval: Duration::from_secs(save_interval_secs),
        })
    }
}
