//! Core domain types for the psidb client
//!
//! The typed form model every screen renders from and writes back to:
//! - `PathEntry`, `IdEntry` - entries owned by a list editor
//! - `KeyValuePair` - one metadata pair
//! - `Action` - the kind of connection created by `connect`
//! - `Severity` - notification severity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Index assigned to an entry by its editor. Unique per editor instance and
/// never reused, even after the entry is removed.
pub type EntryIndex = usize;

// ─────────────────────────────────────────────────────────────────────────────
// List entries
// ─────────────────────────────────────────────────────────────────────────────

/// A filesystem path picked by the user, with optional extra text (the
/// script argument on the add-transform screen)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    pub index: EntryIndex,
    pub path: String,
    pub argument: Option<String>,
}

impl PathEntry {
    pub fn new(index: EntryIndex, path: impl Into<String>) -> Self {
        Self {
            index,
            path: path.into(),
            argument: None,
        }
    }

    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.argument = Some(argument.into());
        self
    }

    /// Argument text, empty when none was given
    pub fn argument_text(&self) -> &str {
        self.argument.as_deref().unwrap_or("")
    }
}

/// Raw identifier text as typed by the user. May be empty or non-numeric
/// until validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdEntry {
    pub index: EntryIndex,
    pub value: String,
}

impl IdEntry {
    /// New entries start empty
    pub fn new(index: EntryIndex) -> Self {
        Self {
            index,
            value: String::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Metadata
// ─────────────────────────────────────────────────────────────────────────────

/// One metadata pair. Both sides default to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    pub key: String,
    pub value: String,
}

impl KeyValuePair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Both key and value are empty
    pub fn is_blank(&self) -> bool {
        self.key.is_empty() && self.value.is_empty()
    }

    /// Exactly one of key and value is empty
    pub fn is_partial(&self) -> bool {
        self.key.is_empty() != self.value.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Connection action
// ─────────────────────────────────────────────────────────────────────────────

/// The kind of connection created between entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Applies a transform to data
    #[default]
    Apply,
    /// Chains transforms together
    Chain,
    /// Links datasets together
    Link,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Apply, Action::Chain, Action::Link];

    /// Wire text for the `action` argument
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Apply => "apply",
            Action::Chain => "chain",
            Action::Link => "link",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apply" => Ok(Action::Apply),
            "chain" => Ok(Action::Chain),
            "link" => Ok(Action::Link),
            other => Err(format!(
                "unknown action '{}', expected one of apply, chain, link",
                other
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Notification severity
// ─────────────────────────────────────────────────────────────────────────────

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_entry_argument_text() {
        let entry = PathEntry::new(0, "/scripts/rot13.py");
        assert_eq!(entry.argument_text(), "");

        let entry = entry.with_argument("-n 3");
        assert_eq!(entry.argument_text(), "-n 3");
    }

    #[test]
    fn test_id_entry_starts_empty() {
        let entry = IdEntry::new(4);
        assert_eq!(entry.index, 4);
        assert!(entry.value.is_empty());
    }

    #[test]
    fn test_key_value_pair_blank_and_partial() {
        assert!(KeyValuePair::default().is_blank());
        assert!(!KeyValuePair::default().is_partial());

        assert!(KeyValuePair::new("k", "").is_partial());
        assert!(KeyValuePair::new("", "v").is_partial());

        let full = KeyValuePair::new("k", "v");
        assert!(!full.is_blank());
        assert!(!full.is_partial());
    }

    #[test]
    fn test_action_parse() {
        assert_eq!("apply".parse::<Action>().unwrap(), Action::Apply);
        assert_eq!(" Chain ".parse::<Action>().unwrap(), Action::Chain);
        assert_eq!("LINK".parse::<Action>().unwrap(), Action::Link);
        assert!("merge".parse::<Action>().is_err());
    }

    #[test]
    fn test_action_wire_text() {
        for action in Action::ALL {
            assert_eq!(action.to_string(), action.as_str());
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }
}
