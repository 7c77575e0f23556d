//! Output formatting for the CLI.

use anyhow::Result;
use console::style;
use serde::Serialize;
use slashbot_core::{Command, DispatchReport};
use std::fmt::Write;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

/// Render a value in the specified format.
pub fn render<T: Serialize + HumanDisplay>(value: &T, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Human => value.human_display(),
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    })
}

/// Print a value in the specified format.
pub fn print<T: Serialize + HumanDisplay>(value: &T, format: OutputFormat) -> Result<()> {
    println!("{}", render(value, format)?.trim_end());
    Ok(())
}

/// Print a success message.
pub fn print_success(message: &str, format: OutputFormat) -> Result<()> {
    let status = serde_json::json!({ "status": "ok", "message": message });
    match format {
        OutputFormat::Human => println!("{} {message}", style("✓").green()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&status)?),
    }
    Ok(())
}

/// Trait for human-readable display.
pub trait HumanDisplay {
    fn human_display(&self) -> String;
}

/// Commands found in one comment body.
#[derive(Debug, Serialize)]
pub struct ParsedComment {
    pub commands: Vec<Command>,
}

impl HumanDisplay for ParsedComment {
    fn human_display(&self) -> String {
        if self.commands.is_empty() {
            return "No commands found.".to_string();
        }

        let verb_width = self
            .commands
            .iter()
            .map(|command| command.verb.to_string().len())
            .max()
            .unwrap_or(4);

        let mut out = String::new();
        for command in &self.commands {
            let verb = format!("{:<verb_width$}", command.verb.to_string());
            let args = if command.args.is_empty() {
                "-".to_string()
            } else {
                command.args.join(", ")
            };
            let _ = writeln!(out, "{}  {args}", style(verb).cyan());
        }
        out
    }
}

impl HumanDisplay for DispatchReport {
    fn human_display(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Event:     {}", self.event);
        let captured = if self.captured.is_empty() {
            "-".to_string()
        } else {
            self.captured.join(", ")
        };
        let _ = writeln!(out, "Captured:  {captured}");

        if self.failed.is_empty() {
            let _ = writeln!(out, "Result:    {}", style("ok").green());
        } else {
            let _ = writeln!(out, "Result:    {}", style("failed").red().bold());
            for failure in &self.failed {
                let _ = writeln!(out, "  {}: {}", style(&failure.handler).yellow(), failure.error);
            }
        }
        out
    }
}
