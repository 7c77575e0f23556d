//! `/label` and `/unlabel` on issues.

use super::{Actor, ActorOptions, Captured, execute_label_delta, narrow_comment};
use crate::command::LABEL;
use crate::error::ActorError;
use crate::event::{ItemKind, RawEvent};
use crate::gateway::Gateway;
use crate::reconcile::LabelDelta;
use std::sync::Arc;

const NAME: &str = "label";

/// Adds and removes arbitrary repository labels on open issues.
pub struct LabelActor {
    gateway: Arc<dyn Gateway>,
    state: Option<Captured<LabelDelta>>,
}

impl LabelActor {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>, _options: &ActorOptions) -> Box<dyn Actor> {
        Box::new(Self {
            gateway,
            state: None,
        })
    }
}

impl Actor for LabelActor {
    fn name(&self) -> &'static str {
        NAME
    }

    fn capture(&mut self, event: &RawEvent) -> bool {
        let Some(comment) = narrow_comment(NAME, event, ItemKind::Issue) else {
            return false;
        };

        let delta = LabelDelta::from_commands(&LABEL.extract(&comment.body), "");
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
