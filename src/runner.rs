//! Runs one CLI command against the backend
//!
//! [`run`] owns the process lifecycle; [`execute`] maps a parsed command to
//! its page and works against any [`Backend`], so it can be driven by a
//! mock in tests.

use std::path::Path;

use psidb_app::config::{self, Settings};
use psidb_app::editor::KeyValueFormEditor;
use psidb_app::pages::{
    AddDataPage, AddTransformPage, ApplyPage, ChainPage, ConnectPage, DbPathSelectorPage,
    HomePage, InitDbPage, LinkPage, PageContext,
};
use psidb_app::{DispatchOutcome, NotificationPort, SubmitOutcome};
use psidb_backend::{Backend, BackendProcess};
use psidb_core::prelude::*;

use crate::cli::{Args, Command, MetadataArgs};
use crate::console::{ArgPicker, ConsoleNotifier};
use crate::headless::{HeadlessEvent, HeadlessNotifier};

/// What a command produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReport {
    /// Machine-readable outcome label
    pub outcome: &'static str,
    pub success: bool,
    /// Result text for stdout (directories, screen list)
    pub output: Option<String>,
    /// Why the command failed, when known
    pub reason: Option<String>,
}

impl CommandReport {
    fn from_submit(outcome: SubmitOutcome) -> Self {
        let reason = match &outcome {
            SubmitOutcome::Dispatched(DispatchOutcome::Failed(reason)) => Some(reason.clone()),
            _ => None,
        };
        Self {
            outcome: outcome.label(),
            success: outcome.is_success(),
            output: None,
            reason,
        }
    }

    fn query(success: bool, output: Option<String>) -> Self {
        Self {
            outcome: if success { "succeeded" } else { "rejected" },
            success,
            output,
            reason: None,
        }
    }
}

/// Load settings from `explicit`, or from the per-user config file
///
/// The per-user file is created with defaults on first use.
pub fn load_config(explicit: Option<&Path>) -> Settings {
    if let Some(path) = explicit {
        return config::load_settings(path);
    }

    let Some(dir) = config::default_config_dir() else {
        warn!("No config directory on this platform, using defaults");
        return Settings::default();
    };

    match config::init_config_dir(&dir) {
        Ok(path) => config::load_settings(&path),
        Err(e) => {
            warn!("Could not prepare config directory {:?}: {}", dir, e);
            Settings::default()
        }
    }
}

/// Run the parsed command; returns whether it succeeded
pub async fn run(args: Args) -> Result<bool> {
    let settings = load_config(args.config.as_deref());
    let assume_yes = args.yes || (args.headless && settings.behavior.assume_yes);

    info!(
        "Running '{}' (headless={}, backend={})",
        args.command.name(),
        args.headless,
        settings.backend.command
    );

    let mut process = BackendProcess::spawn(&settings.backend.command, &settings.backend.args)
        .context("Failed to start the psidb backend")?;
    let sender = process.command_sender()?;

    let report = if args.headless {
        let notifier = HeadlessNotifier::new(assume_yes);
        let report = execute(&args.command, &settings, &sender, &notifier).await;
        HeadlessEvent::outcome(
            args.command.name(),
            report.outcome,
            report.output.clone().or_else(|| report.reason.clone()),
        )
        .emit();
        report
    } else {
        let notifier = ConsoleNotifier::new(assume_yes);
        let report = execute(&args.command, &settings, &sender, &notifier).await;
        if let Some(output) = &report.output {
            println!("{}", output);
        }
        report
    };

    // The sender holds the stdin pipe open
    drop(sender);
    if let Err(e) = process.shutdown().await {
        warn!("Backend shutdown failed: {}", e);
    }

    info!("'{}' finished: {}", args.command.name(), report.outcome);
    Ok(report.success)
}

fn fill_metadata(editor: &mut KeyValueFormEditor, metadata: &MetadataArgs) {
    for pair in metadata.to_pairs() {
        editor.push(pair.key, pair.value);
    }
}

/// Build the page for `command`, fill it from the arguments and submit it
pub async fn execute<B: Backend, N: NotificationPort>(
    command: &Command,
    settings: &Settings,
    backend: &B,
    notifier: &N,
) -> CommandReport {
    let ctx = PageContext::new(backend, notifier);

    match command {
        Command::Home => {
            let screens = HomePage.available_screens(&ctx).await;
            let listing = screens
                .iter()
                .map(|screen| format!("  {:<14} {}", screen.command(), screen.title()))
                .collect::<Vec<_>>()
                .join("\n");
            CommandReport::query(true, Some(listing))
        }

        Command::Init { dir } => {
            let dir = settings.database.resolve_dir(dir.as_deref());
            let picker = ArgPicker::new(dir.into_iter().collect());
            let report = InitDbPage.choose_and_initialize(&ctx, &picker).await;
            CommandReport::query(report.initialized, Some(report.directory))
        }

        Command::Load { dir } => {
            let dir = settings.database.resolve_dir(dir.as_deref());
            let picker = ArgPicker::new(dir.into_iter().collect());
            let report = DbPathSelectorPage.choose_and_load(&ctx, &picker).await;
            CommandReport::query(report.loaded, Some(report.directory))
        }

        Command::Where => {
            let current = DbPathSelectorPage.current(&ctx).await;
            CommandReport::query(current.is_some(), current)
        }

        Command::AddData { paths, metadata } => {
            let mut page = AddDataPage::new();
            page.pick_paths(&ArgPicker::new(paths.clone())).await;
            fill_metadata(&mut page.metadata, metadata);
            CommandReport::from_submit(page.submit(&ctx).await)
        }

        Command::AddTransform {
            paths,
            args,
            metadata,
        } => {
            let mut page = AddTransformPage::new();
            let added = page.pick_scripts(&ArgPicker::new(paths.clone())).await;
            if args.len() > added.len() {
                warn!(
                    "{} script argument(s) given for {} script(s); extra ignored",
                    args.len(),
                    added.len()
                );
            }
            for (index, arg) in added.iter().zip(args) {
                if !arg.is_empty() {
                    page.scripts.set_argument(*index, Some(arg.clone()));
                }
            }
            fill_metadata(&mut page.metadata, metadata);
            CommandReport::from_submit(page.submit(&ctx).await)
        }

        Command::Chain {
            transform_ids,
            metadata,
        } => {
            let mut page = ChainPage::new();
            page.transform_ids.add_values(transform_ids.clone());
            fill_metadata(&mut page.metadata, metadata);
            CommandReport::from_submit(page.submit(&ctx).await)
        }

        Command::Apply {
            transform_ids,
            data_ids,
            metadata,
        } => {
            let mut page = ApplyPage::new();
            page.transform_ids.add_values(transform_ids.clone());
            page.data_ids.add_values(data_ids.clone());
            fill_metadata(&mut page.metadata, metadata);
            CommandReport::from_submit(page.submit(&ctx).await)
        }

        Command::Link { data_ids, metadata } => {
            let mut page = LinkPage::new();
            page.data_ids.add_values(data_ids.clone());
            fill_metadata(&mut page.metadata, metadata);
            CommandReport::from_submit(page.submit(&ctx).await)
        }

        Command::Connect {
            action,
            in_data_ids,
            out_data_ids,
            in_transform_ids,
            out_transform_ids,
            metadata,
        } => {
            let mut page = ConnectPage::new(*action);
            page.in_data_ids.add_values(in_data_ids.clone());
            page.out_data_ids.add_values(out_data_ids.clone());
            page.in_transform_ids.add_values(in_transform_ids.clone());
            page.out_transform_ids.add_values(out_transform_ids.clone());
            fill_metadata(&mut page.metadata, metadata);
            CommandReport::from_submit(page.submit(&ctx).await)
        }
    }
}
