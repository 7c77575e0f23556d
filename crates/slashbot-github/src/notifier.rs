//! Markdown chat webhook used by `/sync`.

use crate::error::Result;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Serialize;
use slashbot_core::{GatewayError, GatewayResult, Notifier};
use std::time::Duration;
use tracing::debug;

/// Posts markdown messages to a group-chat robot webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    http: Client,
    url: String,
}

#[derive(Debug, Serialize)]
struct MarkdownMessage<'a> {
    msgtype: &'static str,
    markdown: Markdown<'a>,
}

#[derive(Debug, Serialize)]
struct Markdown<'a> {
    title: String,
    text: &'a str,
}

impl WebhookNotifier {
    /// Create a notifier posting to `url`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

impl Notifier for WebhookNotifier {
    fn send_message(&self, item_id: i64, content: &str) -> GatewayResult<()> {
        if content.is_empty() {
            return Err(GatewayError::EmptyContent);
        }

        let message = MarkdownMessage {
            msgtype: "markdown",
            markdown: Markdown {
                title: format!("Issue #{item_id} sync request"),
                text: content,
            },
        };

        let response = self
            .http
            .post(&self.url)
            .json(&message)
            .send()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(GatewayError::Status {
                operation: "send notification",
                status: status.as_u16(),
                message: response.text().unwrap_or_default(),
            });
        }

        debug!(item_id, "Notification delivered");
        Ok(())
    }
}
