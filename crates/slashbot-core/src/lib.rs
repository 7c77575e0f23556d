//! slashbot-core: Slash-command handling for GitHub issue and pull request comments.
//!
//! This crate provides:
//! - `RawEvent`: Webhook payloads narrowed to the kinds the bot understands
//! - Command grammars for `/label`, `/area`, `/cc` and `/sync`
//! - `Actor` handlers with a capture/handle lifecycle
//! - Label reconciliation against the repository and item label sets
//! - `Dispatcher`: Routes an event to every registered handler
//!
//! Remote effects go through the `Gateway` and `Notifier` traits.

pub mod actor;
pub mod command;
pub mod error;
pub mod event;
pub mod gateway;
pub mod reconcile;
pub mod registry;

#[cfg(test)]
mod testing;

pub use actor::{Actor, ActorFactory, ActorOptions, AreaActor, CcActor, LabelActor, SyncActor};
pub use command::{Command, Grammar, Verb, extract_all};
pub use error::{ActorError, CoreError, GatewayError, Result};
pub use event::{Comment, ItemKind, ItemRef, RawEvent, RepoRef};
pub use gateway::{Gateway, GatewayResult, Notifier};
pub use reconcile::{LabelDelta, LabelMutation, Reconciliation, reconcile};
pub use registry::{DispatchReport, Dispatcher, HandlerFailure, registered};
