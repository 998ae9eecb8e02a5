//! Screens that register new entries from picked files

use psidb_backend::{Backend, BackendCommand};
use psidb_core::prelude::*;
use psidb_core::EntryIndex;

use super::{PageContext, SubmitOutcome};
use crate::editor::{KeyValueFormEditor, PathListEditor};
use crate::ports::{NotificationPort, PathPicker, PickRequest};
use crate::serializer;

pub const DATA_PICK_TITLE: &str = "Choose the path(s) to your data";
pub const SCRIPT_PICK_TITLE: &str = "Choose the path(s)";

/// Register data files
#[derive(Debug, Clone, Default)]
pub struct AddDataPage {
    pub paths: PathListEditor,
    pub metadata: KeyValueFormEditor,
}

impl AddDataPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn pick_paths<P: PathPicker>(&mut self, picker: &P) -> Vec<EntryIndex> {
        self.paths
            .add_from_picker(picker, PickRequest::files(DATA_PICK_TITLE))
            .await
    }

    pub async fn submit<B: Backend, N: NotificationPort>(
        &self,
        ctx: &PageContext<'_, B, N>,
    ) -> SubmitOutcome {
        if !ctx.require_database().await {
            return SubmitOutcome::DatabaseUnavailable;
        }

        let entries = self.paths.list().to_vec();
        let pairs = self.metadata.snapshot();

        let validator = ctx.validator();
        let paths = validator.paths(&entries).await;
        let metadata = validator.metadata(&pairs).await;

        if !(paths.accepted && metadata.accepted) {
            debug!("add data aborted by validation");
            return SubmitOutcome::Aborted;
        }

        let command = BackendCommand::AddData {
            data_paths: serializer::paths(&entries),
            meta_data: serializer::metadata(&metadata.items),
        };
        SubmitOutcome::Dispatched(ctx.dispatcher().submit(command).await)
    }
}

/// Register transform scripts, each with optional arguments
#[derive(Debug, Clone, Default)]
pub struct AddTransformPage {
    pub scripts: PathListEditor,
    pub metadata: KeyValueFormEditor,
}

impl AddTransformPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn pick_scripts<P: PathPicker>(&mut self, picker: &P) -> Vec<EntryIndex> {
        self.scripts
            .add_from_picker(picker, PickRequest::files(SCRIPT_PICK_TITLE))
            .await
    }

    pub async fn submit<B: Backend, N: NotificationPort>(
        &self,
        ctx: &PageContext<'_, B, N>,
    ) -> SubmitOutcome {
        if !ctx.require_database().await {
            return SubmitOutcome::DatabaseUnavailable;
        }

        let entries = self.scripts.list().to_vec();
        let pairs = self.metadata.snapshot();

        let validator = ctx.validator();
        let scripts = validator.paths(&entries).await;
        let metadata = validator.metadata(&pairs).await;

        if !(scripts.accepted && metadata.accepted) {
            debug!("add transform aborted by validation");
            return SubmitOutcome::Aborted;
        }

        let command = BackendCommand::AddTransform {
            script_paths: serializer::paths(&entries),
            script_args: serializer::script_args(&entries),
            meta_data: serializer::metadata(&metadata.items),
        };
        SubmitOutcome::Dispatched(ctx.dispatcher().submit(command).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::DispatchOutcome;
    use crate::gate::NO_DATABASE_MSG;
    use crate::ports::Picked;
    use crate::test_utils::{ScriptedNotifier, ScriptedPicker};
    use crate::validation::{NO_METADATA_MSG, NO_PATHS_MSG};
    use psidb_backend::test_utils::MockBackend;
    use serde_json::json;

    #[tokio::test]
    async fn test_add_data_dispatches_serialized_state() {
        let backend = MockBackend::new();
        let notifier = ScriptedNotifier::new();
        let ctx = PageContext::new(&backend, &notifier);

        let mut page = AddDataPage::new();
        page.paths.add_paths(["/data/a.csv", "/data/b.csv"]);
        page.metadata.push("source", "lab");
        page.metadata.push("run", "3");

        let outcome = page.submit(&ctx).await;

        assert_eq!(outcome, SubmitOutcome::Dispatched(DispatchOutcome::Succeeded));
        assert_eq!(
            backend.mutating_calls(),
            vec![BackendCommand::AddData {
                data_paths: vec!["/data/a.csv".to_string(), "/data/b.csv".to_string()],
                meta_data: "source=lab;run=3".to_string(),
            }]
        );
        assert!(notifier.confirmations().is_empty());
        assert_eq!(notifier.messages(), vec!["Data added successfully!"]);
    }

    #[tokio::test]
    async fn test_add_data_gate_closed_skips_validation() {
        let backend = MockBackend::without_database();
        let notifier = ScriptedNotifier::new();
        let ctx = PageContext::new(&backend, &notifier);

        let page = AddDataPage::new();
        assert_eq!(page.submit(&ctx).await, SubmitOutcome::DatabaseUnavailable);

        assert_eq!(notifier.messages(), vec![NO_DATABASE_MSG]);
        assert!(notifier.confirmations().is_empty());
        assert!(backend.mutating_calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_data_runs_every_validation() {
        // No paths and no metadata: the path error and the metadata prompt
        // are both shown before aborting
        let backend = MockBackend::new();
        let notifier = ScriptedNotifier::new();
        let ctx = PageContext::new(&backend, &notifier);

        let outcome = AddDataPage::new().submit(&ctx).await;

        assert_eq!(outcome, SubmitOutcome::Aborted);
        assert_eq!(notifier.messages(), vec![NO_PATHS_MSG]);
        assert_eq!(notifier.confirmations(), vec![NO_METADATA_MSG]);
        assert!(backend.mutating_calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_transform_encodes_arguments() {
        let backend = MockBackend::new();
        let notifier = ScriptedNotifier::new();
        let ctx = PageContext::new(&backend, &notifier);
        let picker = ScriptedPicker::new([Picked::Many(vec![
            "/s/clean.py".to_string(),
            "/s/plot.py".to_string(),
        ])]);

        let mut page = AddTransformPage::new();
        let added = page.pick_scripts(&picker).await;
        page.scripts.set_argument(added[0], Some("--strict".to_string()));
        page.metadata.push("author", "me");

        page.submit(&ctx).await;

        assert_eq!(picker.requests()[0].title, SCRIPT_PICK_TITLE);
        assert_eq!(
            backend.mutating_calls(),
            vec![BackendCommand::AddTransform {
                script_paths: vec!["/s/clean.py".to_string(), "/s/plot.py".to_string()],
                script_args: "--strict;".to_string(),
                meta_data: "author=me".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_add_transform_rejected_by_backend() {
        let backend = MockBackend::new().with_result("add_transform", json!(false));
        let notifier = ScriptedNotifier::new();
        let ctx = PageContext::new(&backend, &notifier);

        let mut page = AddTransformPage::new();
        page.scripts.add_paths(["/s/a.py"]);
        page.metadata.push("k", "v");

        assert_eq!(
            page.submit(&ctx).await,
            SubmitOutcome::Dispatched(DispatchOutcome::Rejected)
        );
        assert!(notifier.messages()[0].starts_with("Error: Failed to add transform."));
    }
}
