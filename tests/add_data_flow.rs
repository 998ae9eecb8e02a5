//! End-to-end flows through the CLI layer against a mock backend

use psidb_app::config::Settings;
use psidb_app::test_utils::ScriptedNotifier;
use psidb_app::validation::{NO_METADATA_MSG, NO_PATHS_MSG};
use psidb_backend::test_utils::MockBackend;
use psidb_backend::BackendCommand;
use psidb_client::cli::{Command, MetadataArgs};
use psidb_client::execute;
use psidb_core::Severity;

fn add_data(paths: &[&str], pairs: &[&str]) -> Command {
    Command::AddData {
        paths: paths.iter().map(|p| p.to_string()).collect(),
        metadata: MetadataArgs {
            pairs: pairs.iter().map(|p| p.to_string()).collect(),
        },
    }
}

#[tokio::test]
async fn test_cancel_no_metadata_prompt_skips_add_data() {
    let backend = MockBackend::new();
    let notifier = ScriptedNotifier::answering([false]);

    let report = execute(
        &add_data(&["/data/x.csv"], &[]),
        &Settings::default(),
        &backend,
        &notifier,
    )
    .await;

    assert_eq!(report.outcome, "aborted");
    assert!(!report.success);
    assert_eq!(notifier.confirmations(), vec![NO_METADATA_MSG]);
    assert_eq!(backend.call_count("add_data"), 0);
}

#[tokio::test]
async fn test_confirm_no_metadata_prompt_sends_add_data() {
    let backend = MockBackend::new();
    let notifier = ScriptedNotifier::answering([true]);

    let report = execute(
        &add_data(&["/data/x.csv"], &[]),
        &Settings::default(),
        &backend,
        &notifier,
    )
    .await;

    assert!(report.success);
    assert_eq!(
        backend.calls(),
        vec![
            BackendCommand::IsDbLoaded,
            BackendCommand::AddData {
                data_paths: vec!["/data/x.csv".to_string()],
                meta_data: String::new(),
            },
        ]
    );

    let request = backend.mutating_calls()[0].params();
    assert_eq!(request["dataPaths"], serde_json::json!(["/data/x.csv"]));
    assert_eq!(request["metaDataStr"], "");
    assert_eq!(
        notifier.notifications(),
        vec![(Severity::Info, "Data added successfully!".to_string())]
    );
}

#[tokio::test]
async fn test_required_rejection_never_dispatches() {
    let backend = MockBackend::new();
    let notifier = ScriptedNotifier::new();

    let report = execute(
        &add_data(&[], &["source=lab"]),
        &Settings::default(),
        &backend,
        &notifier,
    )
    .await;

    assert_eq!(report.outcome, "aborted");
    assert_eq!(notifier.messages(), vec![NO_PATHS_MSG]);
    assert!(backend.mutating_calls().is_empty());

    let chain = Command::Chain {
        transform_ids: vec![],
        metadata: MetadataArgs {
            pairs: vec!["k=v".to_string()],
        },
    };
    let report = execute(&chain, &Settings::default(), &backend, &notifier).await;

    assert_eq!(report.outcome, "aborted");
    assert!(backend.mutating_calls().is_empty());
}

#[tokio::test]
async fn test_no_database_blocks_before_validation() {
    let backend = MockBackend::without_database();
    let notifier = ScriptedNotifier::new();

    let report = execute(
        &add_data(&[], &[]),
        &Settings::default(),
        &backend,
        &notifier,
    )
    .await;

    assert_eq!(report.outcome, "database_unavailable");
    assert!(notifier.confirmations().is_empty());
    assert_eq!(backend.calls(), vec![BackendCommand::IsDbLoaded]);
}
