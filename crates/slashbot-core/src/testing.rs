//! In-memory gateway and event builders shared by the unit tests.

use crate::error::GatewayError;
use crate::event::{
    Issue, IssueComment, IssueCommentEvent, RawEvent, RepoRef, Repository, User,
};
use crate::gateway::{Gateway, GatewayResult, Notifier};
use chrono::Utc;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Mutex;

/// A gateway call as seen by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListRepositoryLabels,
    ListItemLabels(u64),
    AddLabel(u64, String),
    RemoveLabel(u64, String),
    RequestReviewers(u64, Vec<String>),
    RemoveReviewers(u64, Vec<String>),
    PostComment(u64, String),
}

/// Records every call and answers from fixed label sets.
#[derive(Debug, Default)]
pub struct FakeGateway {
    pub repo_labels: BTreeSet<String>,
    pub item_labels: BTreeSet<String>,
    pub reviewer_status: Option<u16>,
    /// Label whose mutation fails with a 500.
    pub fail_label: Option<String>,
    pub fail_comment: bool,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeGateway {
    pub fn with_labels(repo: &[&str], item: &[&str]) -> Self {
        Self {
            repo_labels: repo.iter().map(|label| (*label).to_string()).collect(),
            item_labels: item.iter().map(|label| (*label).to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that change remote state.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| {
                !matches!(call, Call::ListRepositoryLabels | Call::ListItemLabels(_))
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn fail_for(&self, label: &str) -> GatewayResult<()> {
        if self.fail_label.as_deref() == Some(label) {
            return Err(GatewayError::Status {
                operation: "label mutation",
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(())
    }
}

impl Gateway for FakeGateway {
    fn list_repository_labels(&self, _repo: &RepoRef) -> GatewayResult<BTreeSet<String>> {
        self.record(Call::ListRepositoryLabels);
        Ok(self.repo_labels.clone())
    }

    fn list_item_labels(&self, _repo: &RepoRef, number: u64) -> GatewayResult<BTreeSet<String>> {
        self.record(Call::ListItemLabels(number));
        Ok(self.item_labels.clone())
    }

    fn add_label(&self, _repo: &RepoRef, number: u64, label: &str) -> GatewayResult<()> {
        self.record(Call::AddLabel(number, label.to_string()));
        self.fail_for(label)
    }

    fn remove_label(&self, _repo: &RepoRef, number: u64, label: &str) -> GatewayResult<()> {
        self.record(Call::RemoveLabel(number, label.to_string()));
        self.fail_for(label)
    }

    fn request_reviewers(
        &self,
        _repo: &RepoRef,
        number: u64,
        reviewers: &[String],
    ) -> GatewayResult<u16> {
        self.record(Call::RequestReviewers(number, reviewers.to_vec()));
        Ok(self.reviewer_status.unwrap_or(201))
    }

    fn remove_reviewers(
        &self,
        _repo: &RepoRef,
        number: u64,
        reviewers: &[String],
    ) -> GatewayResult<()> {
        self.record(Call::RemoveReviewers(number, reviewers.to_vec()));
        Ok(())
    }

    fn post_comment(&self, _repo: &RepoRef, number: u64, body: &str) -> GatewayResult<()> {
        self.record(Call::PostComment(number, body.to_string()));
        if self.fail_comment {
            return Err(GatewayError::Transport("connection reset".to_string()));
        }
        Ok(())
    }
}

/// Records notifications.
#[derive(Debug, Default)]
pub struct FakeNotifier {
    pub sent: Mutex<Vec<(i64, String)>>,
}

impl Notifier for FakeNotifier {
    fn send_message(&self, item_id: i64, content: &str) -> GatewayResult<()> {
        if content.is_empty() {
            return Err(GatewayError::EmptyContent);
        }
        self.sent.lock().unwrap().push((item_id, content.to_string()));
        Ok(())
    }
}

/// Builder for `issue_comment` events.
#[derive(Debug, Clone)]
pub struct CommentEventBuilder {
    event: IssueCommentEvent,
}

impl CommentEventBuilder {
    pub fn issue(body: &str) -> Self {
        Self {
            event: IssueCommentEvent {
                action: "created".to_string(),
                issue: Issue {
                    id: 1001,
                    number: 42,
                    title: "Widgets crash on startup".to_string(),
                    state: Some("open".to_string()),
                    labels: Vec::new(),
                    pull_request: None,
                    closed_at: None,
                    closed_by: None,
                },
                comment: IssueComment {
                    id: 7,
                    body: Some(body.to_string()),
                    user: User {
                        login: "alice".to_string(),
                    },
                },
                repository: Repository {
                    full_name: "acme/widgets".to_string(),
                    name: "widgets".to_string(),
                    owner: None,
                },
                sender: None,
            },
        }
    }

    pub fn pull_request(body: &str) -> Self {
        let mut builder = Self::issue(body);
        builder.event.issue.pull_request = Some(json!({
            "url": "https://api.github.com/repos/acme/widgets/pulls/42"
        }));
        builder
    }

    pub fn closed_at(mut self) -> Self {
        self.event.issue.closed_at = Some(Utc::now());
        self
    }

    pub fn closed_by(mut self, login: &str) -> Self {
        self.event.issue.closed_by = Some(User {
            login: login.to_string(),
        });
        self
    }

    pub fn action(mut self, action: &str) -> Self {
        self.event.action = action.to_string();
        self
    }

    pub fn without_body(mut self) -> Self {
        self.event.comment.body = None;
        self
    }

    pub fn build(self) -> RawEvent {
        RawEvent::from(self.event)
    }
}
