//! GitHub webhook payload model and event narrowing.

use crate::error::{CoreError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event kind tag for issue and pull request comments.
pub const ISSUE_COMMENT: &str = "issue_comment";
/// Event kind tag GitHub sends when a webhook is first registered.
pub const PING: &str = "ping";

/// A GitHub account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub login: String,
}

/// A label attached to an issue or configured on a repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    pub name: String,
}

/// The issue (or pull request) a comment belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub id: i64,
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Present only when the issue is a pull request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_by: Option<User>,
}

impl Issue {
    /// Check whether this issue is a pull request.
    #[must_use]
    pub const fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// Check whether the issue has been closed by any signal GitHub reports.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
            || self.closed_by.is_some()
            || self.state.as_deref() == Some("closed")
    }
}

/// A comment on an issue or pull request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssueComment {
    pub id: i64,
    #[serde(default)]
    pub body: Option<String>,
    pub user: User,
}

/// The repository an event was delivered for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repository {
    pub full_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<User>,
}

/// Payload of the `issue_comment` webhook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssueCommentEvent {
    pub action: String,
    pub issue: Issue,
    pub comment: IssueComment,
    pub repository: Repository,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<User>,
}

/// Payload of the `ping` webhook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PingEvent {
    #[serde(default)]
    pub zen: Option<String>,
    #[serde(default)]
    pub hook_id: Option<i64>,
}

/// A webhook event as delivered, narrowed to the kinds the bot understands.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEvent {
    IssueComment(Box<IssueCommentEvent>),
    Ping(PingEvent),
    /// Any other event kind; the body is not decoded.
    Unsupported { kind: String },
}

impl RawEvent {
    /// Decode a webhook body using the `X-GitHub-Event` tag.
    ///
    /// # Errors
    /// Returns `CoreError::MalformedPayload` if a known kind fails to decode.
    pub fn from_webhook(kind: &str, body: &[u8]) -> Result<Self> {
        let malformed = |source| CoreError::MalformedPayload {
            kind: kind.to_string(),
            source,
        };

        match kind {
            ISSUE_COMMENT => serde_json::from_slice(body)
                .map(|event| Self::IssueComment(Box::new(event)))
                .map_err(malformed),
            PING => serde_json::from_slice(body).map(Self::Ping).map_err(malformed),
            other => Ok(Self::Unsupported {
                kind: other.to_string(),
            }),
        }
    }

    /// The webhook kind tag of this event.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::IssueComment(_) => ISSUE_COMMENT,
            Self::Ping(_) => PING,
            Self::Unsupported { kind } => kind,
        }
    }

    /// Narrow the event to an issue comment payload.
    ///
    /// # Errors
    /// Returns `CoreError::UnsupportedPayload` for any other kind.
    pub fn issue_comment(&self) -> Result<&IssueCommentEvent> {
        match self {
            Self::IssueComment(event) => Ok(event),
            other => Err(CoreError::UnsupportedPayload(other.kind().to_string())),
        }
    }
}

impl From<IssueCommentEvent> for RawEvent {
    fn from(event: IssueCommentEvent) -> Self {
        Self::IssueComment(Box::new(event))
    }
}

/// Whether an item is a plain issue or a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Issue,
    PullRequest,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Issue => write!(f, "issue"),
            Self::PullRequest => write!(f, "pull request"),
        }
    }
}

/// Owner and name of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Resolve the repository from a payload, preferring `full_name`.
    #[must_use]
    pub fn from_repository(repository: &Repository) -> Self {
        if let Some((owner, name)) = repository.full_name.split_once('/') {
            return Self::new(owner, name);
        }
        let owner = repository
            .owner
            .as_ref()
            .map(|user| user.login.clone())
            .unwrap_or_default();
        Self::new(owner, repository.name.clone())
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Reference to the item a comment was left on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: i64,
    pub number: u64,
    pub title: String,
    pub repo: RepoRef,
    pub kind: ItemKind,
    pub closed: bool,
}

/// A comment narrowed out of an `issue_comment` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub body: String,
    pub author: String,
    pub item: ItemRef,
}

impl Comment {
    #[must_use]
    pub fn from_event(event: &IssueCommentEvent) -> Self {
        let issue = &event.issue;
        let kind = if issue.is_pull_request() {
            ItemKind::PullRequest
        } else {
            ItemKind::Issue
        };

        Self {
            body: event.comment.body.clone().unwrap_or_default(),
            author: event.comment.user.login.clone(),
            item: ItemRef {
                id: issue.id,
                number: issue.number,
                title: issue.title.clone(),
                repo: RepoRef::from_repository(&event.repository),
                kind,
                closed: issue.is_closed(),
            },
        }
    }
}
