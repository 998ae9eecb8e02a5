//! Layered accept / confirm / reject policy for collected form state
//!
//! Three shapes are shared by every screen:
//! - path sets: reject when empty, no prompt
//! - id sets: warn on empty or non-numeric input, then a per-call-site
//!   policy for an empty result ([`IdPolicy`])
//! - metadata sets: drop fully blank pairs, warn on half-filled pairs or on
//!   no metadata at all
//!
//! Prompts go through the [`NotificationPort`], so the scanning itself stays
//! deterministic. A rejected or cancelled outcome never touches the editors.

use psidb_core::prelude::*;
use psidb_core::{IdEntry, KeyValuePair, PathEntry, Severity};

use crate::ports::NotificationPort;

pub const NO_PATHS_MSG: &str = "Error: Please specify at least one path";
pub const NO_IDS_MSG: &str = "Error: No IDs specified";
pub const INVALID_IDS_MSG: &str = "Warning: At least one of the IDs is either empty or not a number";
pub const PARTIAL_METADATA_MSG: &str =
    "Warning: At least one of the key and/or value pairs is empty";
pub const NO_METADATA_MSG: &str = "Warning: No metadata specified";

/// Filtered projection of editor state plus the verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome<T> {
    pub items: Vec<T>,
    pub accepted: bool,
}

impl<T> ValidationOutcome<T> {
    pub fn accepted(items: Vec<T>) -> Self {
        Self {
            items,
            accepted: true,
        }
    }

    pub fn rejected(items: Vec<T>) -> Self {
        Self {
            items,
            accepted: false,
        }
    }

    fn with_verdict(items: Vec<T>, accepted: bool) -> Self {
        Self { items, accepted }
    }
}

/// What to do when an id list validates to nothing
///
/// - `error_on_empty` - hard reject with `error_msg`
/// - otherwise, a non-empty `error_msg` is shown as a confirm prompt
/// - otherwise, an empty list is silently accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdPolicy {
    pub error_on_empty: bool,
    pub error_msg: String,
}

impl Default for IdPolicy {
    fn default() -> Self {
        Self::required()
    }
}

impl IdPolicy {
    /// At least one id is mandatory
    pub fn required() -> Self {
        Self {
            error_on_empty: true,
            error_msg: NO_IDS_MSG.to_string(),
        }
    }

    /// An empty list needs explicit confirmation
    pub fn confirm_empty(warning: impl Into<String>) -> Self {
        Self {
            error_on_empty: false,
            error_msg: warning.into(),
        }
    }

    /// An empty list is fine
    pub fn optional() -> Self {
        Self {
            error_on_empty: false,
            error_msg: String::new(),
        }
    }
}

/// Parse id inputs; returns the parsed ids and whether any input was empty
/// or not a number
pub fn scan_ids(entries: &[IdEntry]) -> (Vec<u64>, bool) {
    let mut should_warn = false;
    let mut ids = Vec::with_capacity(entries.len());

    for entry in entries {
        match entry.value.trim().parse::<u64>() {
            Ok(id) => ids.push(id),
            Err(_) => should_warn = true,
        }
    }

    (ids, should_warn)
}

/// Drop fully blank pairs; returns the kept pairs and whether any kept pair
/// is half empty
pub fn scan_metadata(pairs: &[KeyValuePair]) -> (Vec<KeyValuePair>, bool) {
    let should_warn = pairs.iter().any(KeyValuePair::is_partial);
    let kept = pairs.iter().filter(|p| !p.is_blank()).cloned().collect();
    (kept, should_warn)
}

/// Runs the validation shapes against one notification surface
pub struct Validator<'a, N> {
    notifier: &'a N,
}

impl<'a, N: NotificationPort> Validator<'a, N> {
    pub fn new(notifier: &'a N) -> Self {
        Self { notifier }
    }

    /// At least one path is required; no prompt, no filtering
    pub async fn paths(&self, entries: &[PathEntry]) -> ValidationOutcome<String> {
        let items: Vec<String> = entries.iter().map(|e| e.path.clone()).collect();

        if items.is_empty() {
            debug!("path validation rejected: no paths");
            self.notifier.notify(Severity::Error, NO_PATHS_MSG).await;
            return ValidationOutcome::rejected(items);
        }

        ValidationOutcome::accepted(items)
    }

    /// Parse ids, prompting on bad input or an empty result per `policy`
    pub async fn ids(&self, entries: &[IdEntry], policy: &IdPolicy) -> ValidationOutcome<u64> {
        let (ids, should_warn) = scan_ids(entries);

        if should_warn {
            let ok = self.notifier.confirm(INVALID_IDS_MSG).await;
            debug!("id validation: invalid input, confirmed={}", ok);
            return ValidationOutcome::with_verdict(ids, ok);
        }

        if !ids.is_empty() {
            return ValidationOutcome::accepted(ids);
        }

        if policy.error_on_empty {
            debug!("id validation rejected: no ids");
            self.notifier
                .notify(Severity::Error, &policy.error_msg)
                .await;
            ValidationOutcome::rejected(ids)
        } else if !policy.error_msg.is_empty() {
            let ok = self.notifier.confirm(&policy.error_msg).await;
            debug!("id validation: empty list, confirmed={}", ok);
            ValidationOutcome::with_verdict(ids, ok)
        } else {
            ValidationOutcome::accepted(ids)
        }
    }

    /// Keep non-blank pairs, prompting on half-filled pairs or no metadata
    pub async fn metadata(&self, pairs: &[KeyValuePair]) -> ValidationOutcome<KeyValuePair> {
        let (kept, should_warn) = scan_metadata(pairs);

        let accepted = if should_warn {
            self.notifier.confirm(PARTIAL_METADATA_MSG).await
        } else if kept.is_empty() {
            self.notifier.confirm(NO_METADATA_MSG).await
        } else {
            true
        };

        debug!(
            "metadata validation: {} pair(s) kept, accepted={}",
            kept.len(),
            accepted
        );
        ValidationOutcome::with_verdict(kept, accepted)
    }
}
