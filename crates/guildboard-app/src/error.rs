//! Error types for the board server binary.

use guildboard_server::ServerError;

/// Errors that can abort startup.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An environment variable could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The HTTP server failed to bind or serve.
    #[error("server error: {0}")]
    Server(#[from] ServerError),
}
