//! Page controllers, one per use case
//!
//! Each page owns the editors for its inputs and exposes a `submit` that
//! runs the whole pipeline: gate, every validation, serialization, one
//! dispatch. Collaborators are passed in through a [`PageContext`].

pub mod database;
pub mod forms;
pub mod home;
pub mod relations;

pub use database::{DbPathSelectorPage, InitDbPage, InitReport, LoadReport};
pub use forms::{AddDataPage, AddTransformPage};
pub use home::{HomePage, Screen};
pub use relations::{ApplyPage, ChainPage, ConnectPage, LinkPage};

use psidb_backend::Backend;

use crate::dispatcher::{CommandDispatcher, DispatchOutcome};
use crate::gate;
use crate::ports::NotificationPort;
use crate::validation::Validator;

/// How a submit attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The gate was closed; nothing was collected
    DatabaseUnavailable,
    /// A validation rejected or a confirmation was cancelled
    Aborted,
    /// Exactly one command was sent
    Dispatched(DispatchOutcome),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Dispatched(DispatchOutcome::Succeeded))
    }

    /// Short machine-readable label
    pub fn label(&self) -> &'static str {
        match self {
            SubmitOutcome::DatabaseUnavailable => "database_unavailable",
            SubmitOutcome::Aborted => "aborted",
            SubmitOutcome::Dispatched(DispatchOutcome::Succeeded) => "succeeded",
            SubmitOutcome::Dispatched(DispatchOutcome::Rejected) => "rejected",
            SubmitOutcome::Dispatched(DispatchOutcome::Failed(_)) => "failed",
        }
    }
}

/// Services a page needs to run
pub struct PageContext<'a, B, N> {
    pub backend: &'a B,
    pub notifier: &'a N,
}

impl<'a, B: Backend, N: NotificationPort> PageContext<'a, B, N> {
    pub fn new(backend: &'a B, notifier: &'a N) -> Self {
        Self { backend, notifier }
    }

    pub fn validator(&self) -> Validator<'a, N> {
        Validator::new(self.notifier)
    }

    pub fn dispatcher(&self) -> CommandDispatcher<'a, B, N> {
        CommandDispatcher::new(self.backend, self.notifier)
    }

    /// Run the database gate, notifying when it is closed
    pub async fn require_database(&self) -> bool {
        gate::require_database(self.backend, self.notifier).await
    }
}
