//! Database location screens: initialize a new database, select an existing one
//!
//! Neither runs the availability gate: they are how a database becomes
//! available in the first place.

use std::fmt;

use psidb_backend::{Backend, BackendCommand};
use psidb_core::prelude::*;
use psidb_core::Severity;

use super::PageContext;
use crate::dispatcher::DispatchOutcome;
use crate::ports::{NotificationPort, PathPicker, PickRequest};

pub const INIT_PICK_TITLE: &str = "Choose the directory to contain the database";
pub const LOAD_PICK_TITLE: &str = "Choose the directory containing the database (db.ron)";
pub const NOT_A_DATABASE_MSG: &str =
    "The currently chosen directory does not contain a psidb database (db.ron file)";

/// Result line of an initialization attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    /// Directory the backend reports after the attempt
    pub directory: String,
    pub initialized: bool,
}

impl fmt::Display for InitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.initialized {
            write!(f, "{} ✅ Initialized successfully", self.directory)
        } else {
            write!(f, "{} ❌ Failed to initialize, try again", self.directory)
        }
    }
}

/// Create a new database
#[derive(Debug, Clone, Copy, Default)]
pub struct InitDbPage;

impl InitDbPage {
    /// Ask for a directory, then initialize it
    pub async fn choose_and_initialize<B, N, P>(
        &self,
        ctx: &PageContext<'_, B, N>,
        picker: &P,
    ) -> InitReport
    where
        B: Backend,
        N: NotificationPort,
        P: PathPicker,
    {
        let directory = picker
            .pick(PickRequest::directory(INIT_PICK_TITLE))
            .await
            .into_directory();
        self.initialize(ctx, directory).await
    }

    /// Initialize a database in `directory`
    ///
    /// An empty directory lets the backend use its default location. The
    /// reported directory is re-read from the backend, since the chosen one
    /// may not be where the database ended up.
    pub async fn initialize<B: Backend, N: NotificationPort>(
        &self,
        ctx: &PageContext<'_, B, N>,
        directory: String,
    ) -> InitReport {
        let dispatcher = ctx.dispatcher();
        let initialized = dispatcher
            .execute(BackendCommand::InitDb {
                db_path: directory.clone(),
            })
            .await
            .is_success();

        let directory = dispatcher
            .query_text(BackendCommand::GetCurrDbDir)
            .await
            .unwrap_or(directory);

        let report = InitReport {
            directory,
            initialized,
        };
        info!("{}", report);

        let severity = if initialized {
            Severity::Info
        } else {
            Severity::Error
        };
        ctx.notifier.notify(severity, &report.to_string()).await;
        report
    }
}

/// Result of selecting a database directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Directory to show as the current database location
    pub directory: String,
    pub loaded: bool,
}

/// Settings screen: where the database lives
#[derive(Debug, Clone, Copy, Default)]
pub struct DbPathSelectorPage;

impl DbPathSelectorPage {
    /// Directory of the database the backend currently uses
    pub async fn current<B: Backend, N: NotificationPort>(
        &self,
        ctx: &PageContext<'_, B, N>,
    ) -> Option<String> {
        ctx.dispatcher()
            .query_text(BackendCommand::GetCurrDbDir)
            .await
    }

    /// Ask for a directory, then load it
    pub async fn choose_and_load<B, N, P>(
        &self,
        ctx: &PageContext<'_, B, N>,
        picker: &P,
    ) -> LoadReport
    where
        B: Backend,
        N: NotificationPort,
        P: PathPicker,
    {
        let directory = picker
            .pick(PickRequest::directory(LOAD_PICK_TITLE))
            .await
            .into_directory();
        self.load(ctx, directory).await
    }

    /// Load the database in `directory`
    ///
    /// On failure the user is told, and the directory the backend still
    /// uses is reported instead.
    pub async fn load<B: Backend, N: NotificationPort>(
        &self,
        ctx: &PageContext<'_, B, N>,
        directory: String,
    ) -> LoadReport {
        let outcome = ctx
            .dispatcher()
            .execute(BackendCommand::LoadDb {
                db_path: directory.clone(),
            })
            .await;

        if outcome == DispatchOutcome::Succeeded && !directory.is_empty() {
            return LoadReport {
                directory,
                loaded: true,
            };
        }

        let loaded = outcome.is_success();
        if !loaded {
            warn!("load_db rejected '{}'", directory);
            ctx.notifier
                .notify(Severity::Error, NOT_A_DATABASE_MSG)
                .await;
        }

        let directory = self.current(ctx).await.unwrap_or(directory);
        LoadReport { directory, loaded }
    }
}
