//! Bot configuration.

use crate::error::{GithubError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "slashbot.yml";

/// Bot configuration stored in `slashbot.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// GitHub API access.
    #[serde(default)]
    pub github: GithubSettings,

    /// Notification channel for `/sync`.
    #[serde(default)]
    pub notifier: NotifierSettings,

    /// Webhook listener.
    #[serde(default)]
    pub server: ServerSettings,
}

fn default_version() -> u32 {
    1
}

/// GitHub API settings. The token itself never lives in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubSettings {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Name of the environment variable holding the token.
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token_env: default_token_env(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl GithubSettings {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Resolve the token through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    /// Returns `GithubError::MissingToken` if the variable is unset or blank.
    pub fn token_from(&self, lookup: impl FnOnce(&str) -> Option<String>) -> Result<String> {
        lookup(&self.token_env)
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| GithubError::MissingToken(self.token_env.clone()))
    }

    /// Read the token from the process environment.
    ///
    /// # Errors
    /// Returns `GithubError::MissingToken` if the variable is unset or blank.
    pub fn token(&self) -> Result<String> {
        self.token_from(|name| std::env::var(name).ok())
    }
}

/// Notification webhook settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifierSettings {
    /// Chat webhook endpoint. `/sync` fails when unset.
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// Listener address for `slashbot serve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8787
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            version: 1,
            github: GithubSettings::default(),
            notifier: NotifierSettings::default(),
            server: ServerSettings::default(),
        }
    }
}

impl BotConfig {
    /// Load a configuration file.
    ///
    /// # Errors
    /// Returns error if the file doesn't exist or is not valid YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GithubError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Write this configuration to `path`, replacing any existing file.
    ///
    /// # Errors
    /// Returns error if serialization or IO fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Write the default configuration to a new file.
    ///
    /// # Errors
    /// Returns error if the file already exists or IO fails.
    pub fn write_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Err(GithubError::ConfigExists(path.to_path_buf()));
        }

        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }
}
