//! Label reconciliation.
//!
//! A requested delta is compared against two snapshots: the labels configured
//! on the repository and the labels currently on the item. The outcome is the
//! list of mutations that are safe to apply plus the requests that cannot be
//! satisfied.
//!
//! | Request | Item has it | Repo has it | Outcome |
//! |---------|-------------|-------------|---------|
//! | add     | yes         | -           | skipped |
//! | add     | no          | no          | unconfigured |
//! | add     | no          | yes         | mutation |
//! | remove  | no          | -           | not present |
//! | remove  | yes         | no          | skipped |
//! | remove  | yes         | yes         | mutation |

use crate::command::Command;
use crate::error::GatewayError;
use crate::event::{ItemKind, RepoRef};
use crate::gateway::Gateway;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Labels to add and remove, in the order they were requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelDelta {
    pub add: Vec<String>,
    pub remove: Vec<String>,
}

impl LabelDelta {
    /// Build a delta from label or area commands.
    ///
    /// Each argument is trimmed and prefixed with `prefix`; the verb decides
    /// whether it is an addition or a removal.
    #[must_use]
    pub fn from_commands<'a>(
        commands: impl IntoIterator<Item = &'a Command>,
        prefix: &str,
    ) -> Self {
        let mut delta = Self::default();
        for command in commands {
            let target = if command.verb.is_removal() {
                &mut delta.remove
            } else {
                &mut delta.add
            };
            target.extend(
                command
                    .args
                    .iter()
                    .map(|arg| arg.trim())
                    .filter(|arg| !arg.is_empty())
                    .map(|arg| format!("{prefix}{arg}")),
            );
        }
        delta
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// A single label change to send to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "label", rename_all = "lowercase")]
pub enum LabelMutation {
    Add(String),
    Remove(String),
}

/// Outcome of comparing a delta against the remote snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// Mutations to apply, additions first, each group in request order.
    pub mutations: Vec<LabelMutation>,
    /// Additions naming a label the repository does not define.
    pub unconfigured: Vec<String>,
    /// Removals naming a label the item does not carry.
    pub not_present: Vec<String>,
}

/// Compare `delta` against the repository and item label sets.
///
/// Every request is judged against the fetched `item_labels`, never against
/// the mutations planned so far. Repeated requests for the same label in the
/// same direction are collapsed to the first one.
#[must_use]
pub fn reconcile(
    delta: &LabelDelta,
    repo_labels: &BTreeSet<String>,
    item_labels: &BTreeSet<String>,
) -> Reconciliation {
    let mut plan = Reconciliation::default();

    let mut seen = BTreeSet::new();
    for label in delta.add.iter().filter(|label| seen.insert(label.as_str())) {
        if item_labels.contains(label) {
            debug!(label = %label, "Label already present, skipping");
        } else if !repo_labels.contains(label) {
            plan.unconfigured.push(label.clone());
        } else {
            plan.mutations.push(LabelMutation::Add(label.clone()));
        }
    }

    let mut seen = BTreeSet::new();
    for label in delta.remove.iter().filter(|label| seen.insert(label.as_str())) {
        if !item_labels.contains(label) {
            plan.not_present.push(label.clone());
        } else if repo_labels.contains(label) {
            plan.mutations.push(LabelMutation::Remove(label.clone()));
        }
    }

    plan
}

impl Reconciliation {
    /// Apply the planned mutations in order, stopping at the first failure.
    ///
    /// Returns the number of mutations applied.
    ///
    /// # Errors
    /// Returns the first gateway error; later mutations are not attempted.
    pub fn apply(
        &self,
        gateway: &dyn Gateway,
        repo: &RepoRef,
        number: u64,
    ) -> Result<usize, GatewayError> {
        for mutation in &self.mutations {
            match mutation {
                LabelMutation::Add(label) => {
                    gateway.add_label(repo, number, label)?;
                    info!(repo = %repo, item = number, label = %label, "Added label");
                }
                LabelMutation::Remove(label) => {
                    gateway.remove_label(repo, number, label)?;
                    info!(repo = %repo, item = number, label = %label, "Removed label");
                }
            }
        }
        Ok(self.mutations.len())
    }

    /// Render the user-facing problem report, addressed to `login`.
    ///
    /// At most one category is reported: unconfigured additions take
    /// priority over removals of labels the item does not carry.
    #[must_use]
    pub fn report(&self, login: &str, kind: ItemKind) -> Option<String> {
        if !self.unconfigured.is_empty() {
            Some(format!(
                "@{login} These labels ({}) cannot be added because they are not configured in this repository.",
                quote_list(&self.unconfigured)
            ))
        } else if !self.not_present.is_empty() {
            Some(format!(
                "@{login} These labels ({}) cannot be removed because they are not present on this {kind}.",
                quote_list(&self.not_present)
            ))
        } else {
            None
        }
    }
}

fn quote_list(labels: &[String]) -> String {
    labels
        .iter()
        .map(|label| format!("`{label}`"))
        .collect::<Vec<_>>()
        .join(", ")
}
