//! Capabilities the handlers need from the outside world.
//!
//! Implementations live outside this crate; handlers only see these traits.
//! All calls block until the remote side answers.

use crate::error::GatewayError;
use crate::event::RepoRef;
use std::collections::BTreeSet;

/// Result type alias for gateway calls.
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Read and mutate labels, reviewers and comments on the tracking platform.
pub trait Gateway: Send + Sync {
    /// Every label configured on the repository.
    fn list_repository_labels(&self, repo: &RepoRef) -> GatewayResult<BTreeSet<String>>;

    /// Labels currently attached to one issue or pull request.
    fn list_item_labels(&self, repo: &RepoRef, number: u64) -> GatewayResult<BTreeSet<String>>;

    fn add_label(&self, repo: &RepoRef, number: u64, label: &str) -> GatewayResult<()>;

    fn remove_label(&self, repo: &RepoRef, number: u64, label: &str) -> GatewayResult<()>;

    /// Request reviews on a pull request.
    ///
    /// Returns the HTTP status of the response. An unprocessable status
    /// (422) is returned as `Ok` so the caller can decide how to treat it.
    fn request_reviewers(
        &self,
        repo: &RepoRef,
        number: u64,
        reviewers: &[String],
    ) -> GatewayResult<u16>;

    fn remove_reviewers(&self, repo: &RepoRef, number: u64, reviewers: &[String])
    -> GatewayResult<()>;

    fn post_comment(&self, repo: &RepoRef, number: u64, body: &str) -> GatewayResult<()>;
}

/// Outbound notification channel (chat webhook or similar).
pub trait Notifier: Send + Sync {
    /// Send `content` about the item with the given id.
    ///
    /// # Errors
    /// Implementations return `GatewayError::EmptyContent` for empty content
    /// without touching the network.
    fn send_message(&self, item_id: i64, content: &str) -> GatewayResult<()>;
}
