//! slashbot CLI - Run and debug the GitHub slash-command bot.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "slashbot")]
#[command(author, version, about = "Slash-command bot for GitHub issues and pull requests")]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    format: output::OutputFormat,

    /// Log line format (written to stderr)
    #[arg(long, global = true, default_value = "text")]
    log_format: LogFormat,

    /// Configuration file
    #[arg(long, short = 'c', global = true, default_value = slashbot_github::config::CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,

    /// Start the webhook receiver
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides the config file)
        #[arg(long, short = 'p')]
        port: Option<u16>,
    },

    /// Show the commands a comment body contains
    Parse {
        /// Comment body, or `-` to read it from stdin
        body: String,
    },

    /// Dispatch a stored webhook payload against the live gateway
    Replay {
        /// Event kind, as sent in the X-GitHub-Event header
        #[arg(long, short = 'e', default_value = slashbot_core::event::ISSUE_COMMENT)]
        event: String,

        /// JSON payload file
        #[arg(long)]
        payload: PathBuf,
    },
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Commands::Init => commands::init(&cli.config, cli.format),
        Commands::Serve { host, port } => commands::serve(&cli.config, host, port),
        Commands::Parse { body } => commands::parse(&body, cli.format),
        Commands::Replay { event, payload } => {
            commands::replay(&cli.config, &event, &payload, cli.format)
        }
    }
}
