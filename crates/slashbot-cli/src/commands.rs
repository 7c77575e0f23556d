//! CLI command implementations.

use crate::output::{self, OutputFormat, ParsedComment};
use anyhow::{Context, Result, ensure};
use console::style;
use slashbot_core::{ActorOptions, Dispatcher, Notifier, RawEvent, extract_all};
use slashbot_github::{BotConfig, GitHubClient, WebhookNotifier};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Write the default configuration file.
pub fn init(config_path: &Path, format: OutputFormat) -> Result<()> {
    let config = BotConfig::write_default(config_path).context("Failed to write configuration")?;
    output::print_success(
        &format!(
            "Wrote {} (token read from ${})",
            config_path.display(),
            config.github.token_env
        ),
        format,
    )
}

/// Build the dispatcher with the GitHub gateway and, if configured, the notifier.
fn build_dispatcher(config: &BotConfig) -> Result<Dispatcher> {
    let client = GitHubClient::from_config(config).context("Failed to create GitHub client")?;

    let options = match &config.notifier.webhook_url {
        Some(url) => {
            let notifier = WebhookNotifier::new(url.as_str(), config.github.timeout())
                .context("Failed to create notifier")?;
            ActorOptions::with_notifier(Arc::new(notifier) as Arc<dyn Notifier>)
        }
        None => {
            warn!("No notifier webhook configured; /sync requests will fail");
            ActorOptions::default()
        }
    };

    Ok(Dispatcher::new(Arc::new(client), options))
}

fn load_config(config_path: &Path) -> Result<BotConfig> {
    BotConfig::load(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))
}

/// Start the webhook receiver.
pub fn serve(config_path: &Path, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config(config_path)?;
    let dispatcher = build_dispatcher(&config)?;

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    info!(config = %config_path.display(), "Configuration loaded");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async { slashbot_server::serve(dispatcher, &host, port).await })
}

/// Resolve the body argument, reading stdin for `-`.
fn read_body(body: &str) -> Result<String> {
    if body != "-" {
        return Ok(body.to_string());
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read comment body from stdin")?;
    Ok(buf)
}

/// Print the commands a comment body contains.
pub fn parse(body: &str, format: OutputFormat) -> Result<()> {
    let body = read_body(body)?;
    let parsed = ParsedComment {
        commands: extract_all(&body),
    };
    output::print(&parsed, format)
}

/// Dispatch a stored payload through every registered handler.
pub fn replay(config_path: &Path, event: &str, payload: &Path, format: OutputFormat) -> Result<()> {
    let config = load_config(config_path)?;
    let body = std::fs::read(payload)
        .with_context(|| format!("Failed to read payload {}", payload.display()))?;
    let event = RawEvent::from_webhook(event, &body).context("Failed to decode payload")?;

    let dispatcher = build_dispatcher(&config)?;
    let report = dispatcher.dispatch(&event);
    output::print(&report, format)?;

    if report.captured.is_empty() && matches!(format, OutputFormat::Human) {
        println!("{}", style("No handler captured this event.").dim());
    }
    ensure!(
        report.is_success(),
        "{} handler(s) failed",
        report.failed.len()
    );
    Ok(())
}
