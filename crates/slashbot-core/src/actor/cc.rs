//! `/cc` and `/uncc` reviewer requests on pull requests.

use super::{Actor, ActorOptions, Captured, narrow_comment};
use crate::command::CC;
use crate::error::ActorError;
use crate::event::{ItemKind, RawEvent};
use crate::gateway::Gateway;
use std::sync::Arc;
use tracing::{debug, error, info};

const NAME: &str = "cc";

/// HTTP status GitHub uses when a reviewer cannot be requested.
const UNPROCESSABLE_ENTITY: u16 = 422;

/// Reviewers requested by one comment and the direction to apply them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReviewerRequest {
    /// `true` to request reviews, `false` to withdraw them.
    pub grant: bool,
    pub reviewers: Vec<String>,
}

/// Requests or withdraws pull request reviewers.
///
/// All handles found in the comment go out in a single batch. When a comment
/// mixes `/cc` and `/uncc` lines, the last matching line decides the
/// direction for the whole batch.
pub struct CcActor {
    gateway: Arc<dyn Gateway>,
    state: Option<Captured<ReviewerRequest>>,
}

impl CcActor {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>, _options: &ActorOptions) -> Box<dyn Actor> {
        Box::new(Self {
            gateway,
            state: None,
        })
    }
}

impl Actor for CcActor {
    fn name(&self) -> &'static str {
        NAME
    }

    fn capture(&mut self, event: &RawEvent) -> bool {
        let Some(comment) = narrow_comment(NAME, event, ItemKind::PullRequest) else {
            return false;
        };

        let mut request = ReviewerRequest {
            grant: true,
            reviewers: Vec::new(),
        };
        for command in CC.extract(&comment.body) {
            request.grant = !command.verb.is_removal();
            request.reviewers.extend(command.args);
        }
        if request.reviewers.is_empty() {
            debug!(actor = NAME, "No reviewers in comment");
            return false;
        }

        self.state = Some(Captured {
            comment,
            commands: request,
        });
        true
    }

    fn handle(&mut self) -> Result<(), ActorError> {
        let Captured { comment, commands } =
            self.state.take().ok_or(ActorError::NotCaptured(NAME))?;
        let item = &comment.item;
        info!(actor = NAME, repo = %item.repo, item = item.number, "Processing reviewer commands");

        if commands.grant {
            let status = self
                .gateway
                .request_reviewers(&item.repo, item.number, &commands.reviewers)?;
            if status == UNPROCESSABLE_ENTITY {
                error!(actor = NAME, item = item.number, status, "Reviewer request rejected");
                return Err(ActorError::ReviewersRejected {
                    number: item.number,
                    status,
                });
            }
            info!(
                actor = NAME,
                item = item.number,
                reviewers = %commands.reviewers.join(","),
                "Requested reviewers"
            );
        } else {
            self.gateway
                .remove_reviewers(&item.repo, item.number, &commands.reviewers)?;
            info!(
                actor = NAME,
                item = item.number,
                reviewers = %commands.reviewers.join(","),
                "Removed reviewers"
            );
        }
        Ok(())
    }
}
