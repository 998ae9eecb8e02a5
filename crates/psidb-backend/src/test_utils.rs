//! Test utilities for backend consumers
//!
//! Provides [`MockBackend`], an in-memory stand-in for the psidb backend that
//! records every invocation and answers from a per-method script.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::{json, Value};

use psidb_core::prelude::*;

use crate::backend::Backend;
use crate::commands::{next_request_id, BackendCommand, CommandResponse};

/// Scripted answer for one backend method
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Successful response carrying this result
    Result(Value),
    /// Error response (a non-success signal)
    Error(String),
    /// Transport failure: `invoke` returns `Err`
    Unreachable,
}

/// Records invocations and answers from a script
///
/// Defaults: `is_db_loaded` answers `true`, `get_curr_psidb_dir` answers
/// `"/home/user/.psidb"`, every other command answers `true`.
#[derive(Debug, Default)]
pub struct MockBackend {
    replies: Mutex<HashMap<&'static str, MockReply>>,
    calls: Mutex<Vec<BackendCommand>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend with no database loaded
    pub fn without_database() -> Self {
        Self::new().with_result("is_db_loaded", json!(false))
    }

    /// Answer `method` with a successful result
    pub fn with_result(self, method: &'static str, result: Value) -> Self {
        self.with_reply(method, MockReply::Result(result))
    }

    /// Answer `method` with a scripted reply
    pub fn with_reply(self, method: &'static str, reply: MockReply) -> Self {
        self.replies
            .lock()
            .expect("mock replies lock")
            .insert(method, reply);
        self
    }

    /// Every command invoked so far, in order
    pub fn calls(&self) -> Vec<BackendCommand> {
        self.calls.lock().expect("mock calls lock").clone()
    }

    /// Number of invocations of `method`
    pub fn call_count(&self, method: &str) -> usize {
        self.calls()
            .iter()
            .filter(|command| command.method() == method)
            .count()
    }

    /// Invocations of commands that change the database
    pub fn mutating_calls(&self) -> Vec<BackendCommand> {
        self.calls()
            .into_iter()
            .filter(BackendCommand::is_mutating)
            .collect()
    }

    fn reply_for(&self, command: &BackendCommand) -> MockReply {
        let scripted = self
            .replies
            .lock()
            .expect("mock replies lock")
            .get(command.method())
            .cloned();

        scripted.unwrap_or_else(|| match command {
            BackendCommand::GetCurrDbDir => MockReply::Result(json!("/home/user/.psidb")),
            _ => MockReply::Result(json!(true)),
        })
    }
}

impl Backend for MockBackend {
    async fn invoke(&self, command: BackendCommand) -> Result<CommandResponse> {
        let reply = self.reply_for(&command);
        self.calls.lock().expect("mock calls lock").push(command);

        let id = next_request_id();
        match reply {
            MockReply::Result(value) => Ok(CommandResponse::success(id, Some(value))),
            MockReply::Error(message) => Ok(CommandResponse::error(id, message)),
            MockReply::Unreachable => Err(Error::ChannelClosed),
        }
    }
}
