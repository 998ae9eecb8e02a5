//! The backend boundary
//!
//! Everything behind this trait (database load/initialization, graph storage,
//! transform execution) is owned by the backend. The client only names a
//! command, hands over its arguments and waits for the answer.

use psidb_core::prelude::*;

use crate::commands::{BackendCommand, CommandResponse};

/// Invokes named backend commands
///
/// Implemented by [`CommandSender`](crate::CommandSender) for a live backend
/// process, and by `MockBackend` in tests.
#[trait_variant::make(Backend: Send)]
pub trait LocalBackend {
    /// Invoke one command and wait for its response. No retries, no timeout.
    async fn invoke(&self, command: BackendCommand) -> Result<CommandResponse>;
}
