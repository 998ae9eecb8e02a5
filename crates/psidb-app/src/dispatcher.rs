//! Single-shot backend invocation with user feedback
//!
//! One attempt per user action, no retry. A boolean `false`, a non-success
//! response and a transport failure all surface the command's failure text;
//! only the transport failure carries a reason, and that reason goes to the
//! log, not to the user.

use psidb_backend::{Backend, BackendCommand, CommandResponse, ResultKind};
use psidb_core::prelude::*;
use psidb_core::Severity;

use crate::ports::NotificationPort;

/// How one dispatch ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The backend answered `true`
    Succeeded,
    /// The backend answered `false` or with a non-success signal
    Rejected,
    /// The command never got a usable answer
    Failed(String),
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Succeeded)
    }
}

/// User-facing texts for a mutating command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    pub success: &'static str,
    pub failure: &'static str,
}

/// Feedback texts for `command`, `None` for the database commands whose
/// result is reported by their screen
pub fn feedback_for(command: &BackendCommand) -> Option<Feedback> {
    let (success, failure) = match command {
        BackendCommand::AddData { .. } => (
            "Data added successfully!",
            "Error: Failed to add data. Maybe the data already exists",
        ),
        BackendCommand::AddTransform { .. } => (
            "Transform added successfully!",
            "Error: Failed to add transform. Maybe the transform already exists or the database is not loaded (check in settings)?",
        ),
        BackendCommand::Chain { .. } => (
            "Transforms chained successfully!",
            "Error: Failed to chain transforms. Maybe the IDs provided do not exist or the new transform already exists?",
        ),
        BackendCommand::Apply { .. } => (
            "Transform applied successfully!",
            "Error: Failed to apply transform. Maybe the ID provided does not exist or the new data already exists?",
        ),
        BackendCommand::Link { .. } => (
            "Data linked successfully!",
            "Error: Failed to link datasets. Maybe the IDs provided do not exist or the new dataset already exists?",
        ),
        BackendCommand::Connect { .. } => (
            "Connection created successfully!",
            "Error: Failed to connect entries. Maybe the ID provided does not exist or the new entry already exists?",
        ),
        BackendCommand::IsDbLoaded
        | BackendCommand::LoadDb { .. }
        | BackendCommand::InitDb { .. }
        | BackendCommand::GetCurrDbDir => return None,
    };
    Some(Feedback { success, failure })
}

fn classify(command: &BackendCommand, answer: Result<CommandResponse>) -> DispatchOutcome {
    match answer {
        Ok(response) if !response.success => {
            debug!(
                "{} returned a non-success signal: {}",
                command.method(),
                response.error.as_deref().unwrap_or("<none>")
            );
            DispatchOutcome::Rejected
        }
        Ok(response) => match (command.result_kind(), response.as_bool()) {
            (ResultKind::Text, _) if response.as_text().is_some() => DispatchOutcome::Succeeded,
            (ResultKind::Bool, Some(true)) => DispatchOutcome::Succeeded,
            (ResultKind::Bool, Some(false)) => DispatchOutcome::Rejected,
            _ => DispatchOutcome::Failed(format!(
                "{} answered with an unexpected result: {:?}",
                command.method(),
                response.result
            )),
        },
        Err(e) => DispatchOutcome::Failed(e.to_string()),
    }
}

/// Invokes backend commands on behalf of one screen
pub struct CommandDispatcher<'a, B, N> {
    backend: &'a B,
    notifier: &'a N,
}

impl<'a, B: Backend, N: NotificationPort> CommandDispatcher<'a, B, N> {
    pub fn new(backend: &'a B, notifier: &'a N) -> Self {
        Self { backend, notifier }
    }

    /// Invoke a boolean command without notifying anyone
    pub async fn execute(&self, command: BackendCommand) -> DispatchOutcome {
        info!("Dispatching {}", command.description());
        let answer = self.backend.invoke(command.clone()).await;
        let outcome = classify(&command, answer);

        if let DispatchOutcome::Failed(reason) = &outcome {
            warn!("{} failed: {}", command.description(), reason);
        }
        outcome
    }

    /// Invoke a text command; any failure yields `None`
    pub async fn query_text(&self, command: BackendCommand) -> Option<String> {
        match self.backend.invoke(command.clone()).await {
            Ok(response) => response.as_text().map(str::to_string),
            Err(e) => {
                warn!("{} failed: {}", command.description(), e);
                None
            }
        }
    }

    /// Invoke a mutating command and report the result
    pub async fn submit(&self, command: BackendCommand) -> DispatchOutcome {
        let feedback = feedback_for(&command);
        let outcome = self.execute(command).await;

        if let Some(feedback) = feedback {
            if outcome.is_success() {
                self.notifier
                    .notify(Severity::Info, feedback.success)
                    .await;
            } else {
                self.notifier
                    .notify(Severity::Error, feedback.failure)
                    .await;
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedNotifier;
    use psidb_backend::test_utils::{MockBackend, MockReply};
    use serde_json::json;

    fn link() -> BackendCommand {
        BackendCommand::Link {
            data_ids: vec![1, 2],
            meta_data: String::new(),
        }
    }

    #[tokio::test]
    async fn test_submit_success_notifies_info() {
        let backend = MockBackend::new();
        let notifier = ScriptedNotifier::new();

        let outcome = CommandDispatcher::new(&backend, &notifier)
            .submit(link())
            .await;

        assert_eq!(outcome, DispatchOutcome::Succeeded);
        assert_eq!(
            notifier.notifications(),
            vec![(Severity::Info, "Data linked successfully!".to_string())]
        );
        assert_eq!(backend.call_count("link"), 1);
    }

    #[tokio::test]
    async fn test_submit_false_notifies_failure_once() {
        let backend = MockBackend::new().with_result("link", json!(false));
        let notifier = ScriptedNotifier::new();

        let outcome = CommandDispatcher::new(&backend, &notifier)
            .submit(link())
            .await;

        assert_eq!(outcome, DispatchOutcome::Rejected);
        assert_eq!(notifier.notifications().len(), 1);
        assert_eq!(notifier.notifications()[0].0, Severity::Error);
        // No retry
        assert_eq!(backend.call_count("link"), 1);
    }

    #[tokio::test]
    async fn test_submit_error_response_is_rejected() {
        let backend =
            MockBackend::new().with_reply("link", MockReply::Error("no such id".to_string()));
        let notifier = ScriptedNotifier::new();

        let outcome = CommandDispatcher::new(&backend, &notifier)
            .submit(link())
            .await;

        assert_eq!(outcome, DispatchOutcome::Rejected);
        assert!(notifier.messages()[0].starts_with("Error: Failed to link datasets"));
    }

    #[tokio::test]
    async fn test_submit_transport_failure() {
        let backend = MockBackend::new().with_reply("link", MockReply::Unreachable);
        let notifier = ScriptedNotifier::new();

        let outcome = CommandDispatcher::new(&backend, &notifier)
            .submit(link())
            .await;

        assert!(matches!(outcome, DispatchOutcome::Failed(_)));
        assert_eq!(notifier.notifications()[0].0, Severity::Error);
    }

    #[tokio::test]
    async fn test_non_boolean_answer_is_failure() {
        let backend = MockBackend::new().with_result("link", json!("yes"));
        let notifier = ScriptedNotifier::new();

        let outcome = CommandDispatcher::new(&backend, &notifier)
            .execute(link())
            .await;

        assert!(matches!(outcome, DispatchOutcome::Failed(_)));
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_query_text() {
        let backend = MockBackend::new();
        let notifier = ScriptedNotifier::new();
        let dispatcher = CommandDispatcher::new(&backend, &notifier);

        assert_eq!(
            dispatcher.query_text(BackendCommand::GetCurrDbDir).await,
            Some("/home/user/.psidb".to_string())
        );

        let unreachable =
            MockBackend::new().with_reply("get_curr_psidb_dir", MockReply::Unreachable);
        let dispatcher = CommandDispatcher::new(&unreachable, &notifier);
        assert_eq!(dispatcher.query_text(BackendCommand::GetCurrDbDir).await, None);
    }

    #[test]
    fn test_feedback_only_for_mutating_commands() {
        assert!(feedback_for(&BackendCommand::IsDbLoaded).is_none());
        assert!(feedback_for(&BackendCommand::GetCurrDbDir).is_none());
        assert_eq!(
            feedback_for(&link()).map(|f| f.success),
            Some("Data linked successfully!")
        );
    }
}
