//! Error types for the GitHub backend.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for backend setup operations.
pub type Result<T> = std::result::Result<T, GithubError>;

/// Errors that can occur while configuring or constructing the backend.
#[derive(Debug, Error)]
pub enum GithubError {
    /// Configuration file not found.
    #[error("config not found at '{0}'")]
    ConfigNotFound(PathBuf),

    /// Configuration file already exists.
    #[error("config already exists at '{0}'")]
    ConfigExists(PathBuf),

    /// The token environment variable is unset or empty.
    #[error("environment variable '{0}' does not hold a GitHub token")]
    MissingToken(String),

    /// A configured URL could not be parsed.
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// HTTP client construction failed.
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
