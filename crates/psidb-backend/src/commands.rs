//! Command building and request tracking for backend communication
//!
//! This module provides:
//! - The fixed set of named, argument-typed backend commands
//! - Request ID tracking for matching responses
//! - A `CommandSender` that writes requests to the backend and awaits replies
//!
//! There is deliberately no timeout: a backend that never answers blocks the
//! calling user action until the process exits.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot, RwLock};

use psidb_core::prelude::*;
use psidb_core::Action;

use crate::backend::Backend;

/// Global request ID counter
static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a unique request ID
pub fn next_request_id() -> u64 {
    REQUEST_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A pending request awaiting response
struct PendingRequest {
    response_tx: oneshot::Sender<CommandResponse>,
    description: String,
}

/// Response from a command
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResponse {
    pub id: u64,
    pub success: bool,
    pub result: Option<Value>,
    pub error: Option<String>,
}

impl CommandResponse {
    pub fn from_backend_response(id: u64, result: Option<Value>, error: Option<Value>) -> Self {
        Self {
            id,
            success: error.is_none(),
            result,
            error: error.map(|e| match e {
                Value::String(s) => s,
                other => other.to_string(),
            }),
        }
    }

    /// Create a success response
    pub fn success(id: u64, result: Option<Value>) -> Self {
        Self {
            id,
            success: true,
            result,
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: u64, message: impl Into<String>) -> Self {
        Self {
            id,
            success: false,
            result: None,
            error: Some(message.into()),
        }
    }

    /// Boolean result, `None` for a failed or non-boolean response
    pub fn as_bool(&self) -> Option<bool> {
        if !self.success {
            return None;
        }
        self.result.as_ref().and_then(Value::as_bool)
    }

    /// Text result, `None` for a failed or non-string response
    pub fn as_text(&self) -> Option<&str> {
        if !self.success {
            return None;
        }
        self.result.as_ref().and_then(Value::as_str)
    }
}

/// Tracks pending requests and matches responses
#[derive(Default)]
pub struct RequestTracker {
    pending: Arc<RwLock<HashMap<u64, PendingRequest>>>,
    /// Set once the backend is gone; only flipped while holding `pending`
    closed: AtomicBool,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new pending request
    /// Returns (request_id, receiver for response), or `BackendExited` once
    /// the tracker has been closed by [`cancel_all`](Self::cancel_all)
    pub async fn register(
        &self,
        description: &str,
    ) -> Result<(u64, oneshot::Receiver<CommandResponse>)> {
        let mut pending = self.pending.write().await;
        if self.closed.load(Ordering::Acquire) {
            debug!("Refusing '{}': backend has exited", description);
            return Err(Error::BackendExited);
        }

        let id = next_request_id();
        let (tx, rx) = oneshot::channel();
        pending.insert(
            id,
            PendingRequest {
                response_tx: tx,
                description: description.to_string(),
            },
        );

        Ok((id, rx))
    }

    /// Drop a pending request that will never reach the backend
    pub async fn forget(&self, id: u64) {
        self.pending.write().await.remove(&id);
    }


    /// Handle an incoming response from the backend
    /// Returns true if the response was matched to a pending request
    pub async fn handle_response(
        &self,
        id: u64,
        result: Option<Value>,
        error: Option<Value>,
    ) -> bool {
        if let Some(pending) = self.pending.write().await.remove(&id) {
            trace!("Matched response #{} ({})", id, pending.description);
            let response = CommandResponse::from_backend_response(id, result, error);
            let _ = pending.response_tx.send(response);
            true
        } else {
            false
        }
    }

    /// Cancel all pending requests and refuse new ones (the backend exited)
    pub async fn cancel_all(&self) {
        let mut pending = self.pending.write().await;
        self.closed.store(true, Ordering::Release);
        for (id, req) in pending.drain() {
            debug!("Cancelling pending request #{} ({})", id, req.description);
            let _ = req
                .response_tx
                .send(CommandResponse::error(id, "Request cancelled"));
        }
    }

    /// Get the number of pending requests
    pub async fn pending_count(&self) -> usize {
        self.pending.read().await.len()
    }
}

/// What a command answers with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Bool,
    Text,
}

/// Backend command types
///
/// Argument names and shapes are fixed per command; `params()` renders them
/// exactly as the backend expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    /// Whether a database is currently loaded
    IsDbLoaded,
    /// Load the database found in a directory
    LoadDb { db_path: String },
    /// Create a new database in a directory
    InitDb { db_path: String },
    /// Directory of the current database
    GetCurrDbDir,
    AddData {
        data_paths: Vec<String>,
        meta_data: String,
    },
    AddTransform {
        script_paths: Vec<String>,
        script_args: String,
        meta_data: String,
    },
    Chain {
        transform_ids: Vec<u64>,
        meta_data: String,
    },
    Apply {
        transform_id: u64,
        data_ids: Vec<u64>,
        meta_data: String,
    },
    Link {
        data_ids: Vec<u64>,
        meta_data: String,
    },
    Connect {
        action: Action,
        in_data_ids: Vec<u64>,
        out_data_ids: Vec<u64>,
        in_transform_ids: Vec<u64>,
        out_transform_ids: Vec<u64>,
        meta_data: String,
    },
}

impl BackendCommand {
    /// Wire name of the command
    pub fn method(&self) -> &'static str {
        match self {
            BackendCommand::IsDbLoaded => "is_db_loaded",
            BackendCommand::LoadDb { .. } => "load_db",
            BackendCommand::InitDb { .. } => "init_db",
            BackendCommand::GetCurrDbDir => "get_curr_psidb_dir",
            BackendCommand::AddData { .. } => "add_data",
            BackendCommand::AddTransform { .. } => "add_transform",
            BackendCommand::Chain { .. } => "chain",
            BackendCommand::Apply { .. } => "apply",
            BackendCommand::Link { .. } => "link",
            BackendCommand::Connect { .. } => "connect",
        }
    }

    /// Named arguments of the command
    pub fn params(&self) -> Value {
        match self {
            BackendCommand::IsDbLoaded | BackendCommand::GetCurrDbDir => json!({}),
            BackendCommand::LoadDb { db_path } | BackendCommand::InitDb { db_path } => {
                json!({ "dbPath": db_path })
            }
            BackendCommand::AddData {
                data_paths,
                meta_data,
            } => json!({ "dataPaths": data_paths, "metaDataStr": meta_data }),
            BackendCommand::AddTransform {
                script_paths,
                script_args,
                meta_data,
            } => json!({
                "scriptPaths": script_paths,
                "scriptArgsStr": script_args,
                "metaDataStr": meta_data,
            }),
            BackendCommand::Chain {
                transform_ids,
                meta_data,
            } => json!({ "transformIds": transform_ids, "metaDataStr": meta_data }),
            BackendCommand::Apply {
                transform_id,
                data_ids,
                meta_data,
            } => json!({
                "transformId": transform_id,
                "dataIds": data_ids,
                "metaDataStr": meta_data,
            }),
            BackendCommand::Link {
                data_ids,
                meta_data,
            } => json!({ "dataIds": data_ids, "metaDataStr": meta_data }),
            BackendCommand::Connect {
                action,
                in_data_ids,
                out_data_ids,
                in_transform_ids,
                out_transform_ids,
                meta_data,
            } => json!({
                "action": action.as_str(),
                "inDataIds": in_data_ids,
                "outDataIds": out_data_ids,
                "inTransformIds": in_transform_ids,
                "outTransformIds": out_transform_ids,
                "metaDataStr": meta_data,
            }),
        }
    }

    /// Build the request object
    pub fn build(&self, id: u64) -> String {
        json!({
            "id": id,
            "method": self.method(),
            "params": self.params(),
        })
        .to_string()
    }

    /// Whether the command answers with a boolean or a string
    pub fn result_kind(&self) -> ResultKind {
        match self {
            BackendCommand::GetCurrDbDir => ResultKind::Text,
            _ => ResultKind::Bool,
        }
    }

    /// Whether the command changes the database contents
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            BackendCommand::AddData { .. }
                | BackendCommand::AddTransform { .. }
                | BackendCommand::Chain { .. }
                | BackendCommand::Apply { .. }
                | BackendCommand::Link { .. }
                | BackendCommand::Connect { .. }
        )
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            BackendCommand::IsDbLoaded => "check database loaded",
            BackendCommand::LoadDb { .. } => "load database",
            BackendCommand::InitDb { .. } => "initialize database",
            BackendCommand::GetCurrDbDir => "get database directory",
            BackendCommand::AddData { .. } => "add data",
            BackendCommand::AddTransform { .. } => "add transform",
            BackendCommand::Chain { .. } => "chain transforms",
            BackendCommand::Apply { .. } => "apply transform",
            BackendCommand::Link { .. } => "link data",
            BackendCommand::Connect { .. } => "connect entries",
        }
    }
}

/// Sends commands to the backend process with request tracking
#[derive(Clone)]
pub struct CommandSender {
    /// Channel to send raw JSON to the backend's stdin
    stdin_tx: mpsc::Sender<String>,
    /// Request tracker for response matching
    tracker: Arc<RequestTracker>,
}

impl std::fmt::Debug for CommandSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSender")
            .field("stdin_tx", &"<channel>")
            .field("tracker", &"<tracker>")
            .finish()
    }
}

impl CommandSender {
    pub fn new(stdin_tx: mpsc::Sender<String>, tracker: Arc<RequestTracker>) -> Self {
        Self { stdin_tx, tracker }
    }

    /// Send a command and wait for its response
    pub async fn send(&self, command: &BackendCommand) -> Result<CommandResponse> {
        let (id, response_rx) = self.tracker.register(command.description()).await?;

        let wrapped = format!("[{}]", command.build(id));

        debug!("Sending command #{}: {}", id, command.description());

        if self.stdin_tx.send(wrapped).await.is_err() {
            self.tracker.forget(id).await;
            return Err(Error::channel_send("backend stdin"));
        }

        match response_rx.await {
            Ok(response) => {
                debug!("Command #{} completed: success={}", id, response.success);
                Ok(response)
            }
            // Channel closed without an answer
            Err(_) => Err(Error::ChannelClosed),
        }
    }
}

impl Backend for CommandSender {
    async fn invoke(&self, command: BackendCommand) -> Result<CommandResponse> {
        self.send(&command).await
    }
}
