//! Scripted UI surfaces for tests
//!
//! Available in unit tests and, with the `test-helpers` feature, to
//! integration tests of dependent crates.

use std::collections::VecDeque;
use std::sync::Mutex;

use psidb_core::Severity;

use crate::ports::{NotificationPort, PathPicker, PickRequest, Picked};

/// Records every message and answers confirms from a queue
///
/// Once the queue is drained, confirms get the fallback answer.
#[derive(Debug)]
pub struct ScriptedNotifier {
    answers: Mutex<VecDeque<bool>>,
    fallback: bool,
    notifications: Mutex<Vec<(Severity, String)>>,
    confirmations: Mutex<Vec<String>>,
}

impl Default for ScriptedNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedNotifier {
    /// Confirms everything
    pub fn new() -> Self {
        Self {
            answers: Mutex::new(VecDeque::new()),
            fallback: true,
            notifications: Mutex::new(Vec::new()),
            confirmations: Mutex::new(Vec::new()),
        }
    }

    /// Cancels everything
    pub fn declining() -> Self {
        Self {
            fallback: false,
            ..Self::new()
        }
    }

    /// Answer confirms in this order, then confirm everything
    pub fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
        let notifier = Self::new();
        *notifier.answers.lock().unwrap() = answers.into_iter().collect();
        notifier
    }

    pub fn notifications(&self) -> Vec<(Severity, String)> {
        self.notifications.lock().unwrap().clone()
    }

    /// Texts of the confirms that were shown
    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations.lock().unwrap().clone()
    }

    /// Notification texts only, in order
    pub fn messages(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|(_, text)| text)
            .collect()
    }
}

impl NotificationPort for ScriptedNotifier {
    async fn notify(&self, severity: Severity, text: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push((severity, text.to_string()));
    }

    async fn confirm(&self, text: &str) -> bool {
        self.confirmations.lock().unwrap().push(text.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback)
    }
}

/// Hands out queued picker answers and records each request
#[derive(Debug, Default)]
pub struct ScriptedPicker {
    answers: Mutex<VecDeque<Picked>>,
    requests: Mutex<Vec<PickRequest>>,
}

impl ScriptedPicker {
    pub fn new(answers: impl IntoIterator<Item = Picked>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<PickRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl PathPicker for ScriptedPicker {
    async fn pick(&self, request: PickRequest) -> Picked {
        self.requests.lock().unwrap().push(request);
        self.answers.lock().unwrap().pop_front().unwrap_or_default()
    }
}
