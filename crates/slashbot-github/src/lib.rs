//! GitHub backend for slashbot.
//!
//! Provides the concrete collaborators the handlers run against:
//! - `GitHubClient`: REST implementation of the `Gateway` trait
//! - `WebhookNotifier`: Markdown chat webhook implementing `Notifier`
//! - `BotConfig`: YAML configuration shared by the server and the CLI

pub mod client;
pub mod config;
pub mod error;
pub mod notifier;

pub use client::GitHubClient;
pub use config::BotConfig;
pub use error::{GithubError, Result};
pub use notifier::WebhookNotifier;
