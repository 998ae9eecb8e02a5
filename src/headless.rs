//! Headless mode - NDJSON events instead of prompts
//!
//! Every notification, confirmation and final outcome is written to stdout
//! as one JSON object per line, so scripts can drive the client without a
//! terminal. Confirmations are answered from configuration, never asked.
//!
//! # Example Output
//!
//! ```json
//! {"event":"confirm","text":"Warning: No metadata specified","answer":true,"timestamp":1704700001000}
//! {"event":"notification","severity":"info","text":"Data added successfully!","timestamp":1704700002000}
//! {"event":"outcome","command":"add-data","outcome":"succeeded","detail":null,"timestamp":1704700002001}
//! ```

use std::io::{self, Write};

use chrono::Utc;
use serde::Serialize;
use tracing::error;

use psidb_app::ports::NotificationPort;
use psidb_core::Severity;

/// Events emitted in headless mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// A message for the user
    Notification {
        severity: Severity,
        text: String,
        timestamp: i64,
    },

    /// A confirmation and the answer given on the user's behalf
    Confirm {
        text: String,
        answer: bool,
        timestamp: i64,
    },

    /// How the command ended
    Outcome {
        command: String,
        outcome: String,
        detail: Option<String>,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    pub fn notification(severity: Severity, text: &str) -> Self {
        Self::Notification {
            severity,
            text: text.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn confirm(text: &str, answer: bool) -> Self {
        Self::Confirm {
            text: text.to_string(),
            answer,
            timestamp: Self::now(),
        }
    }

    pub fn outcome(command: &str, outcome: &str, detail: Option<String>) -> Self {
        Self::Outcome {
            command: command.to_string(),
            outcome: outcome.to_string(),
            detail,
            timestamp: Self::now(),
        }
    }
}

/// Notification surface that writes [`HeadlessEvent`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessNotifier {
    assume_yes: bool,
}

impl HeadlessNotifier {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl NotificationPort for HeadlessNotifier {
    async fn notify(&self, severity: Severity, text: &str) {
        HeadlessEvent::notification(severity, text).emit();
    }

    async fn confirm(&self, text: &str) -> bool {
        HeadlessEvent::confirm(text, self.assume_yes).emit();
        self.assume_yes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_notification_event_shape() {
        let event = HeadlessEvent::notification(Severity::Error, "Error: No IDs specified");
        let json: Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "notification");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["text"], "Error: No IDs specified");
        assert!(json["timestamp"].as_i64().unwrap() > 0);
    }

    #[test]
    fn test_outcome_event_shape() {
        let event = HeadlessEvent::outcome("where", "succeeded", Some("/db".to_string()));
        let json: Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "outcome");
        assert_eq!(json["command"], "where");
        assert_eq!(json["detail"], "/db");
    }

    #[tokio::test]
    async fn test_confirm_answers_from_configuration() {
        assert!(!HeadlessNotifier::new(false).confirm("Warning: x").await);
        assert!(HeadlessNotifier::new(true).confirm("Warning: x").await);
    }
}
