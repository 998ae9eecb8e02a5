//! # psidb-backend - Backend Command Contract
//!
//! The psidb backend owns the actual database. This crate is the client's
//! side of that boundary: the fixed set of named, argument-typed commands,
//! the line protocol they travel over, and the child process that carries it.
//!
//! Depends on [`psidb_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Commands
//! - [`BackendCommand`] - One variant per backend command, with its wire arguments
//! - [`CommandResponse`] - Boolean or text answer, or a non-success signal
//! - [`Backend`] - Trait for invoking commands (live process or mock)
//!
//! ### Transport
//! - [`BackendProcess`] - Spawn and manage the backend bridge process
//! - [`CommandSender`] - Send requests to a running backend and await replies
//! - [`RequestTracker`] - Track pending request/response pairs
//!
//! ### Protocol Parsing
//! - [`parse_backend_message()`] - Parse one line of backend output

pub mod backend;
pub mod commands;
pub mod process;
pub mod protocol;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use backend::{Backend, LocalBackend};
pub use commands::{
    next_request_id, BackendCommand, CommandResponse, CommandSender, RequestTracker, ResultKind,
};
pub use process::BackendProcess;
pub use protocol::{parse_backend_message, BackendMessage};
