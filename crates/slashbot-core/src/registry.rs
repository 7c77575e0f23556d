//! Event-kind to handler registry and the dispatcher that drives it.

use crate::actor::{Actor, ActorFactory, ActorOptions, AreaActor, CcActor, LabelActor, SyncActor};
use crate::event::{ISSUE_COMMENT, RawEvent};
use crate::gateway::Gateway;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use tracing::{debug, error, info};

/// Handler constructors per event kind, in registration order.
static REGISTRY: LazyLock<HashMap<&'static str, Vec<ActorFactory>>> = LazyLock::new(|| {
    let issue_comment: Vec<ActorFactory> =
        vec![LabelActor::new, AreaActor::new, CcActor::new, SyncActor::new];
    HashMap::from([(ISSUE_COMMENT, issue_comment)])
});

/// Constructors registered for `kind`, empty if the kind is unknown.
#[must_use]
pub fn registered(kind: &str) -> &'static [ActorFactory] {
    REGISTRY.get(kind).map(Vec::as_slice).unwrap_or(&[])
}

/// A handler that captured the event but failed while executing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerFailure {
    pub handler: String,
    pub error: String,
}

/// What happened to one event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub event: String,
    /// Handlers that accepted the event, in registration order.
    pub captured: Vec<String>,
    pub failed: Vec<HandlerFailure>,
}

impl DispatchReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Routes events to freshly built handlers.
#[derive(Clone)]
pub struct Dispatcher {
    gateway: Arc<dyn Gateway>,
    options: ActorOptions,
}

impl Dispatcher {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>, options: ActorOptions) -> Self {
        Self { gateway, options }
    }

    /// Offer `event` to every handler registered for its kind.
    ///
    /// Each handler sees the event independently; a failing handler is
    /// logged and recorded and does not stop the others.
    pub fn dispatch(&self, event: &RawEvent) -> DispatchReport {
        let kind = event.kind();
        let mut report = DispatchReport {
            event: kind.to_string(),
            ..DispatchReport::default()
        };

        let factories = registered(kind);
        if factories.is_empty() {
            debug!(event = kind, "No handlers registered");
            return report;
        }

        let mut accepted: Vec<Box<dyn Actor>> = Vec::new();
        for factory in factories {
            let mut actor = factory(Arc::clone(&self.gateway), &self.options);
            if actor.capture(event) {
                debug!(event = kind, handler = actor.name(), "Handler captured event");
                report.captured.push(actor.name().to_string());
                accepted.push(actor);
            }
        }

        for mut actor in accepted {
            if let Err(e) = actor.handle() {
                error!(event = kind, handler = actor.name(), error = %e, "Handler failed");
                report.failed.push(HandlerFailure {
                    handler: actor.name().to_string(),
                    error: e.to_string(),
                });
            }
        }

        info!(
            event = kind,
            captured = report.captured.len(),
            failed = report.failed.len(),
            "Event dispatched"
        );
        report
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
