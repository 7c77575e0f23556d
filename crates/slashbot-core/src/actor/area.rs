//! `/area` and `/unarea` on pull requests.

use super::{Actor, ActorOptions, Captured, execute_label_delta, narrow_comment};
use crate::command::AREA;
use crate::error::ActorError;
use crate::event::{ItemKind, RawEvent};
use crate::gateway::Gateway;
use crate::reconcile::LabelDelta;
use std::sync::Arc;

const NAME: &str = "area";

/// Prefix joined to every `/area` token to form the label name.
pub const AREA_LABEL_PREFIX: &str = "area/";

/// Manages `area/*` labels on open pull requests.
pub struct AreaActor {
    gateway: Arc<dyn Gateway>,
    state: Option<Captured<LabelDelta>>,
}

impl AreaActor {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>, _options: &ActorOptions) -> Box<dyn Actor> {
        Box::new(Self {
            gateway,
            state: None,
        })
    }
}

impl Actor for AreaActor {
    fn name(&self) -> &'static str {
        NAME
    }

    fn capture(&mut self, event: &RawEvent) -> bool {
        let Some(comment) = narrow_comment(NAME, event, ItemKind::PullRequest) else {
            return false;
        };

        let delta = LabelDelta::from_commands(&AREA.extract(&comment.body), AREA_LABEL_PREFIX);
        if delta.is_empty() {
            return false;
        }

        self.state = Some(Captured {
            comment,
            commands: delta,
        });
        true
    }

    fn handle(&mut self) -> Result<(), ActorError> {
        let captured = self.state.take().ok_or(ActorError::NotCaptured(NAME))?;
        execute_label_delta(NAME, self.gateway.as_ref(), &captured.comment, &captured.commands)
    }
}
