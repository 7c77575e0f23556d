//! GitHub REST implementation of the gateway.

use crate::config::BotConfig;
use crate::error::{GithubError, Result};
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::ACCEPT;
use serde_json::json;
use slashbot_core::event::Label;
use slashbot_core::{Gateway, GatewayError, GatewayResult, RepoRef};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::debug;

const API_VERSION: &str = "2022-11-28";
const MEDIA_TYPE: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("slashbot/", env!("CARGO_PKG_VERSION"));
const PER_PAGE: usize = 100;

/// Blocking GitHub REST client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_base: Url,
    token: String,
}

impl GitHubClient {
    /// Create a client for `api_base` authenticated with `token`.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(api_base: &str, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_base = Url::parse(api_base).map_err(|e| GithubError::InvalidUrl {
            url: api_base.to_string(),
            reason: e.to_string(),
        })?;
        if api_base.cannot_be_a_base() {
            return Err(GithubError::InvalidUrl {
                url: api_base.to_string(),
                reason: "not a base url".to_string(),
            });
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            api_base,
            token: token.into(),
        })
    }

    /// Create a client from the configuration and the token in the environment.
    ///
    /// # Errors
    /// Returns error if the token is missing or the client cannot be built.
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        let token = config.github.token()?;
        Self::new(&config.github.api_base, token, config.github.timeout())
    }

    /// Build `{api_base}/repos/{owner}/{name}/{tail...}` with each segment percent-encoded.
    fn endpoint(&self, repo: &RepoRef, tail: &[&str]) -> GatewayResult<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::Transport(format!("invalid api base '{}'", self.api_base)))?
            .pop_if_empty()
            .extend(["repos", repo.owner.as_str(), repo.name.as_str()])
            .extend(tail);
        Ok(url)
    }

    fn send(&self, request: RequestBuilder) -> GatewayResult<Response> {
        request
            .bearer_auth(&self.token)
            .header(ACCEPT, MEDIA_TYPE)
            .header("x-github-api-version", API_VERSION)
            .send()
            .map_err(|e| GatewayError::Transport(e.to_string()))
    }

    fn send_checked(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> GatewayResult<Response> {
        let response = self.send(request)?;
        if response.status().is_success() {
            return Ok(response);
        }
        Err(status_error(operation, response))
    }

    fn read_labels(response: Response) -> GatewayResult<Vec<Label>> {
        response
            .json::<Vec<Label>>()
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}

fn status_error(operation: &'static str, response: Response) -> GatewayError {
    let status = response.status().as_u16();
    let message = response.text().unwrap_or_default();
    GatewayError::Status {
        operation,
        status,
        message,
    }
}

impl Gateway for GitHubClient {
    fn list_repository_labels(&self, repo: &RepoRef) -> GatewayResult<BTreeSet<String>> {
        let url = self.endpoint(repo, &["labels"])?;
        let mut labels = BTreeSet::new();

        for page in 1.. {
            let request = self
                .http
                .get(url.clone())
                .query(&[("per_page", PER_PAGE.to_string()), ("page", page.to_string())]);
            let batch = Self::read_labels(self.send_checked("list repository labels", request)?)?;
            let count = batch.len();
            labels.extend(batch.into_iter().map(|label| label.name));
            if count < PER_PAGE {
                break;
            }
        }

        debug!(repo = %repo, count = labels.len(), "Listed repository labels");
        Ok(labels)
    }

    fn list_item_labels(&self, repo: &RepoRef, number: u64) -> GatewayResult<BTreeSet<String>> {
        let url = self.endpoint(repo, &["issues", &number.to_string(), "labels"])?;
        let request = self.http.get(url).query(&[("per_page", PER_PAGE)]);
        let labels = Self::read_labels(self.send_checked("list item labels", request)?)?;
        Ok(labels.into_iter().map(|label| label.name).collect())
    }

    fn add_label(&self, repo: &RepoRef, number: u64, label: &str) -> GatewayResult<()> {
        let url = self.endpoint(repo, &["issues", &number.to_string(), "labels"])?;
        let request = self.http.post(url).json(&json!({ "labels": [label] }));
        self.send_checked("add label", request)?;
        Ok(())
    }

    fn remove_label(&self, repo: &RepoRef, number: u64, label: &str) -> GatewayResult<()> {
        let url = self.endpoint(repo, &["issues", &number.to_string(), "labels", label])?;
        self.send_checked("remove label", self.http.delete(url))?;
        Ok(())
    }

    fn request_reviewers(
        &self,
        repo: &RepoRef,
        number: u64,
        reviewers: &[String],
    ) -> GatewayResult<u16> {
        let url = self.endpoint(repo, &["pulls", &number.to_string(), "requested_reviewers"])?;
        let request = self.http.post(url).json(&json!({ "reviewers": reviewers }));
        let response = self.send(request)?;

        let status = response.status();
        if status.is_success() || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY {
            return Ok(status.as_u16());
        }
        Err(status_error("request reviewers", response))
    }

    fn remove_reviewers(
        &self,
        repo: &RepoRef,
        number: u64,
        reviewers: &[String],
    ) -> GatewayResult<()> {
        let url = self.endpoint(repo, &["pulls", &number.to_string(), "requested_reviewers"])?;
        let request = self.http.delete(url).json(&json!({ "reviewers": reviewers }));
        self.send_checked("remove reviewers", request)?;
        Ok(())
    }

    fn post_comment(&self, repo: &RepoRef, number: u64, body: &str) -> GatewayResult<()> {
        let url = self.endpoint(repo, &["issues", &number.to_string(), "comments"])?;
        let request = self.http.post(url).json(&json!({ "body": body }));
        self.send_checked("post comment", request)?;
        Ok(())
    }
}
