//! Database-availability precondition for the mutating screens

use psidb_backend::{Backend, BackendCommand};
use psidb_core::prelude::*;
use psidb_core::Severity;

use crate::ports::NotificationPort;

pub const NO_DATABASE_MSG: &str =
    "No database loaded. Try initializing one or go to the settings to specify the database location";

/// Ask the backend whether a database is loaded
///
/// A failed query counts as "not loaded".
pub async fn database_loaded<B: Backend>(backend: &B) -> bool {
    match backend.invoke(BackendCommand::IsDbLoaded).await {
        Ok(response) => response.as_bool().unwrap_or(false),
        Err(e) => {
            warn!("is_db_loaded failed: {}", e);
            false
        }
    }
}

/// Check the gate and tell the user when it is closed
pub async fn require_database<B: Backend, N: NotificationPort>(backend: &B, notifier: &N) -> bool {
    if database_loaded(backend).await {
        return true;
    }

    info!("No database loaded, aborting");
    notifier.notify(Severity::Info, NO_DATABASE_MSG).await;
    false
}
