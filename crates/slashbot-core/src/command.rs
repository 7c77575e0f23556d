//! Slash-command grammars and the normalized command model.
//!
//! Every grammar scans a comment body line by line. A line matches when it
//! starts (after optional indentation) with the grammar's prefix followed by
//! at least one argument. Matches are returned in source order.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// The instruction a command line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verb {
    AddArea,
    RemoveArea,
    AddReviewer,
    RemoveReviewer,
    AddLabel,
    RemoveLabel,
    Sync,
}

impl Verb {
    /// Whether this verb takes something away rather than granting it.
    #[must_use]
    pub const fn is_removal(self) -> bool {
        matches!(
            self,
            Self::RemoveArea | Self::RemoveReviewer | Self::RemoveLabel
        )
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AddArea => write!(f, "add-area"),
            Self::RemoveArea => write!(f, "remove-area"),
            Self::AddReviewer => write!(f, "add-reviewer"),
            Self::RemoveReviewer => write!(f, "remove-reviewer"),
            Self::AddLabel => write!(f, "add-label"),
            Self::RemoveLabel => write!(f, "remove-label"),
            Self::Sync => write!(f, "sync"),
        }
    }
}

/// A normalized command extracted from one comment line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub verb: Verb,
    pub args: Vec<String>,
}

impl Command {
    #[must_use]
    pub fn new(verb: Verb, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            verb,
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// How a grammar turns the captured argument text into arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arguments {
    /// The whole trimmed remainder is one argument (labels may contain spaces).
    Line,
    /// Whitespace-separated tokens.
    Tokens,
    /// Whitespace-separated `@handle` tokens; the `@` is stripped and empty handles dropped.
    Handles,
    /// No arguments.
    Bare,
}

/// A line-anchored slash-command recognizer.
#[derive(Debug)]
pub struct Grammar {
    pattern: Regex,
    grant: Verb,
    revoke: Verb,
    arguments: Arguments,
}

/// `/label <name>` and `/unlabel <name>`.
pub static LABEL: LazyLock<Grammar> = LazyLock::new(|| Grammar {
    pattern: compile(r"(?m)^[ \t]*/(un)?label[ \t]+(.*\S)[ \t\r]*$"),
    grant: Verb::AddLabel,
    revoke: Verb::RemoveLabel,
    arguments: Arguments::Line,
});

/// `/area <a> <b>` and `/unarea <a>`.
pub static AREA: LazyLock<Grammar> = LazyLock::new(|| Grammar {
    pattern: compile(r"(?m)^[ \t]*/(un)?area[ \t]+(.*\S)[ \t\r]*$"),
    grant: Verb::AddArea,
    revoke: Verb::RemoveArea,
    arguments: Arguments::Tokens,
});

/// `/cc @a @b` and `/uncc @a`, matched case-insensitively.
pub static CC: LazyLock<Grammar> = LazyLock::new(|| Grammar {
    pattern: compile(r"(?mi)^[ \t]*/(un)?cc((?:[ \t]+@[-/\w]*)+)[ \t\r]*$"),
    grant: Verb::AddReviewer,
    revoke: Verb::RemoveReviewer,
    arguments: Arguments::Handles,
});

/// `/sync` on a line of its own.
pub static SYNC: LazyLock<Grammar> = LazyLock::new(|| Grammar {
    pattern: compile(r"(?m)^[ \t]*/sync()()[ \t\r]*$"),
    grant: Verb::Sync,
    revoke: Verb::Sync,
    arguments: Arguments::Bare,
});

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("command grammar pattern is valid")
}

impl Grammar {
    /// Extract every command this grammar recognizes, in source order.
    #[must_use]
    pub fn extract(&self, body: &str) -> Vec<Command> {
        self.extract_positioned(body)
            .into_iter()
            .map(|(_, command)| command)
            .collect()
    }

    /// Check whether any line of `body` yields a command.
    #[must_use]
    pub fn matches(&self, body: &str) -> bool {
        !self.extract_positioned(body).is_empty()
    }

    fn extract_positioned(&self, body: &str) -> Vec<(usize, Command)> {
        self.pattern
            .captures_iter(body)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let verb = if caps.get(1).is_some_and(|m| !m.as_str().is_empty()) {
                    self.revoke
                } else {
                    self.grant
                };
                let text = caps.get(2).map_or("", |m| m.as_str()).trim();

                let args: Vec<String> = match self.arguments {
                    Arguments::Line => vec![text.to_string()],
                    Arguments::Tokens => text.split_whitespace().map(str::to_string).collect(),
                    Arguments::Handles => text
                        .split_whitespace()
                        .filter_map(|token| token.strip_prefix('@'))
                        .filter(|handle| !handle.is_empty())
                        .map(str::to_string)
                        .collect(),
                    Arguments::Bare => Vec::new(),
                };

                if args.is_empty() && self.arguments != Arguments::Bare {
                    return None;
                }
                Some((whole.start(), Command { verb, args }))
            })
            .collect()
    }
}

/// Run every grammar over `body` and return all commands in source order.
#[must_use]
pub fn extract_all(body: &str) -> Vec<Command> {
    let mut positioned: Vec<(usize, Command)> = [&*LABEL, &*AREA, &*CC, &*SYNC]
        .into_iter()
        .flat_map(|grammar| grammar.extract_positioned(body))
        .collect();
    positioned.sort_by_key(|(offset, _)| *offset);
    positioned.into_iter().map(|(_, command)| command).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_label_keeps_interior_whitespace() {
        assert_eq!(
            LABEL.extract("/label help wanted"),
            vec![Command::new(Verb::AddLabel, ["help wanted"])]
        );
        assert_eq!(
            LABEL.extract("/unlabel   good first issue  "),
            vec![Command::new(Verb::RemoveLabel, ["good first issue"])]
        );
    }

    #[test]
    fn test_label_multi_line_source_order() {
        let body = "
            /label area/first
            /label area/second\t\t
            /unlabel help wanted
            /unlabel kind/chore";

        assert_eq!(
            LABEL.extract(body),
            vec![
                Command::new(Verb::AddLabel, ["area/first"]),
                Command::new(Verb::AddLabel, ["area/second"]),
                Command::new(Verb::RemoveLabel, ["help wanted"]),
                Command::new(Verb::RemoveLabel, ["kind/chore"]),
            ]
        );
        assert_eq!(
            LABEL.extract("/label a\n/label b"),
            vec![
                Command::new(Verb::AddLabel, ["a"]),
                Command::new(Verb::AddLabel, ["b"]),
            ]
        );
    }

    #[test]
    fn test_label_requires_an_argument() {
        assert!(LABEL.extract("/label").is_empty());
        assert!(LABEL.extract("/label   \n/unlabel\t").is_empty());
        assert!(LABEL.extract("/labeler bugfix").is_empty());
        assert!(LABEL.extract("please /label bug").is_empty());
    }

    #[test]
    fn test_label_is_case_sensitive() {
        assert!(LABEL.extract("/LABEL bug").is_empty());
        assert!(AREA.extract("/Area bug").is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(
            LABEL.extract("/label bug\r\n/unlabel triage\r\n"),
            vec![
                Command::new(Verb::AddLabel, ["bug"]),
                Command::new(Verb::RemoveLabel, ["triage"]),
            ]
        );
    }

    #[test]
    fn test_area_splits_tokens() {
        assert_eq!(
            AREA.extract("/area bugfix enhancement"),
            vec![Command::new(Verb::AddArea, ["bugfix", "enhancement"])]
        );
        assert_eq!(
            AREA.extract("/unarea    enhancement"),
            vec![Command::new(Verb::RemoveArea, ["enhancement"])]
        );
        assert!(AREA.extract("/area1 feature").is_empty());
        assert!(AREA.extract("/removearea bugfix").is_empty());
    }

    #[test]
    fn test_cc_grant_and_revoke() {
        assert_eq!(
            CC.extract("/cc @foo @bar"),
            vec![Command::new(Verb::AddReviewer, ["foo", "bar"])]
        );
        assert_eq!(
            CC.extract("/uncc @foo"),
            vec![Command::new(Verb::RemoveReviewer, ["foo"])]
        );
        assert_eq!(
            CC.extract("/CC @Foo\n/UnCC @bar"),
            vec![
                Command::new(Verb::AddReviewer, ["Foo"]),
                Command::new(Verb::RemoveReviewer, ["bar"]),
            ]
        );
    }

    #[test]
    fn test_cc_rejects_missing_or_empty_handles() {
        assert!(CC.extract("/cc").is_empty());
        assert!(CC.extract("/cc foo").is_empty());
        assert!(CC.extract("/cc @ @").is_empty());
        assert_eq!(
            CC.extract("/cc @ @org/team"),
            vec![Command::new(Verb::AddReviewer, ["org/team"])]
        );
    }

    #[test]
    fn test_sync_is_bare() {
        assert_eq!(
            SYNC.extract("/sync"),
            vec![Command::new(Verb::Sync, Vec::<String>::new())]
        );
        assert!(SYNC.extract("/sync now").is_empty());
        assert!(SYNC.matches("thanks!\n  /sync  \n"));
    }

    #[test]
    fn test_grammars_do_not_cross_match() {
        let body = "/label bug\n/area core\n/cc @foo\n/sync";
        assert_eq!(LABEL.extract(body).len(), 1);
        assert_eq!(AREA.extract(body).len(), 1);
        assert_eq!(CC.extract(body).len(), 1);
        assert_eq!(SYNC.extract(body).len(), 1);
    }

    #[test]
    fn test_extract_all_orders_across_grammars() {
        let verbs: Vec<Verb> = extract_all("/cc @foo\n/label bug\n/unarea core\n/sync")
            .into_iter()
            .map(|command| command.verb)
            .collect();
        assert_eq!(
            verbs,
            vec![Verb::AddReviewer, Verb::AddLabel, Verb::RemoveArea, Verb::Sync]
        );
    }
}
