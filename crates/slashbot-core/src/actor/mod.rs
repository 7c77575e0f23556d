//! Command handlers.
//!
//! Each handler runs in two steps. `capture` decides from the raw event
//! whether the handler owns it and stores the comment and its commands; it
//! never touches the network. `handle` then executes the stored commands
//! against the gateway. A handler instance serves exactly one event.

mod area;
mod cc;
mod label;
mod sync;

pub use area::AreaActor;
pub use cc::CcActor;
pub use label::LabelActor;
pub use sync::SyncActor;

use crate::error::ActorError;
use crate::event::{Comment, ItemKind, RawEvent};
use crate::gateway::{Gateway, Notifier};
use crate::reconcile::{LabelDelta, reconcile};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// A comment-command handler.
pub trait Actor: Send {
    /// Stable identifier used in logs and dispatch reports.
    fn name(&self) -> &'static str;

    /// Inspect `event` and keep it if this handler owns it.
    fn capture(&mut self, event: &RawEvent) -> bool;

    /// Execute the captured commands.
    ///
    /// # Errors
    /// Returns `ActorError::NotCaptured` if no event was captured, or the
    /// first remote failure.
    fn handle(&mut self) -> Result<(), ActorError>;
}

/// Extra collaborators handed to every actor constructor.
#[derive(Clone, Default)]
pub struct ActorOptions {
    pub notifier: Option<Arc<dyn Notifier>>,
}

impl ActorOptions {
    #[must_use]
    pub fn with_notifier(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier: Some(notifier),
        }
    }
}

impl std::fmt::Debug for ActorOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorOptions")
            .field("notifier", &self.notifier.is_some())
            .finish()
    }
}

/// Constructor signature stored in the dispatch registry.
pub type ActorFactory = fn(Arc<dyn Gateway>, &ActorOptions) -> Box<dyn Actor>;

/// The comment and commands a handler captured.
#[derive(Debug, Clone)]
pub(crate) struct Captured<T> {
    pub comment: Comment,
    pub commands: T,
}

/// Narrow `event` to a comment this actor may act on.
///
/// Rejects non-comment payloads (logged), non-`created` actions, empty
/// bodies, items of the wrong kind and closed items.
pub(crate) fn narrow_comment(actor: &str, event: &RawEvent, expected: ItemKind) -> Option<Comment> {
    let payload = match event.issue_comment() {
        Ok(payload) => payload,
        Err(e) => {
            error!(actor, error = %e, "Cannot narrow event to an issue comment");
            return None;
        }
    };

    if payload.action != "created" {
        debug!(actor, action = %payload.action, "Ignoring comment action");
        return None;
    }

    let comment = Comment::from_event(payload);
    if comment.body.is_empty() || comment.item.kind != expected || comment.item.closed {
        return None;
    }
    Some(comment)
}

/// Reconcile a label delta for the captured item and report problems back
/// to the comment author.
pub(crate) fn execute_label_delta(
    actor: &str,
    gateway: &dyn Gateway,
    comment: &Comment,
    delta: &LabelDelta,
) -> Result<(), ActorError> {
    let item = &comment.item;
    info!(actor, repo = %item.repo, item = item.number, "Processing label commands");

    let repo_labels = gateway.list_repository_labels(&item.repo)?;
    let item_labels = gateway.list_item_labels(&item.repo, item.number)?;
    let plan = reconcile(delta, &repo_labels, &item_labels);

    if let Err(e) = plan.apply(gateway, &item.repo, item.number) {
        error!(actor, item = item.number, error = %e, "Label mutation failed");
        return Err(e.into());
    }

    if let Some(report) = plan.report(&comment.author, item.kind) {
        warn!(
            actor,
            item = item.number,
            unconfigured = ?plan.unconfigured,
            not_present = ?plan.not_present,
            "Some label requests could not be applied"
        );
        gateway.post_comment(&item.repo, item.number, &report)?;
    }
    Ok(())
}
