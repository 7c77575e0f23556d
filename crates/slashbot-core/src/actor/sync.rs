//! `/sync` forwards an issue to the notification channel.

use super::{Actor, ActorOptions, Captured, narrow_comment};
use crate::command::SYNC;
use crate::error::ActorError;
use crate::event::{ItemKind, RawEvent};
use crate::gateway::{Gateway, Notifier};
use std::sync::Arc;
use tracing::{error, info, warn};

const NAME: &str = "sync";

/// Announces an issue on the notification channel.
pub struct SyncActor {
    notifier: Option<Arc<dyn Notifier>>,
    state: Option<Captured<()>>,
}

impl SyncActor {
    #[must_use]
    pub fn new(_gateway: Arc<dyn Gateway>, options: &ActorOptions) -> Box<dyn Actor> {
        Box::new(Self {
            notifier: options.notifier.clone(),
            state: None,
        })
    }
}

impl Actor for SyncActor {
    fn name(&self) -> &'static str {
        NAME
    }

    fn capture(&mut self, event: &RawEvent) -> bool {
        let Some(comment) = narrow_comment(NAME, event, ItemKind::Issue) else {
            return false;
        };
        if !SYNC.matches(&comment.body) {
            return false;
        }

        self.state = Some(Captured {
            comment,
            commands: (),
        });
        true
    }

    fn handle(&mut self) -> Result<(), ActorError> {
        let Captured { comment, .. } = self.state.take().ok_or(ActorError::NotCaptured(NAME))?;
        let Some(notifier) = &self.notifier else {
            warn!(
                actor = NAME,
                item = comment.item.number,
                "Sync requested but no notifier is configured"
            );
            return Err(ActorError::NotifierUnavailable);
        };

        let item = &comment.item;
        let message = format!(
            "User @{} has requested to sync issue #{}: {}",
            comment.author, item.number, item.title
        );

        if let Err(e) = notifier.send_message(item.id, &message) {
            error!(actor = NAME, item = item.number, error = %e, "Failed to send notification");
            return Err(e.into());
        }
        info!(actor = NAME, item = item.number, "Notification sent");
        Ok(())
    }
}
