//! Subcommand implementations.

pub mod format;
pub mod products;
pub mod query;

use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The value could not be interpreted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Backend URL is malformed.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Backend answered with a non-success status.
    #[error("Backend returned {0}")]
    Backend(u16),
}
