//! Line protocol spoken by the psidb backend bridge
//!
//! Every line the backend writes to stdout is one JSON object, optionally
//! wrapped in `[...]`:
//! - a response to a request: `{"id": 3, "result": true}` or
//!   `{"id": 3, "error": "database not loaded"}`
//! - an unsolicited event: `{"event": "log", "params": {"level": "info", "message": "..."}}`

use serde::{Deserialize, Serialize};
use serde_json::Value;

use psidb_core::prelude::*;

/// Strip the outer brackets from a backend message
///
/// Returns the inner content if brackets are present.
pub(crate) fn strip_brackets(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        Some(&trimmed[1..trimmed.len() - 1])
    } else {
        None
    }
}

/// A raw backend message (before parsing into typed messages)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawMessage {
    /// A response to a request we sent
    Response {
        id: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<Value>,
    },
    /// An event from the backend (unsolicited)
    Event {
        event: String,
        #[serde(default)]
        params: Value,
    },
}

/// A parsed backend message
#[derive(Debug, Clone, PartialEq)]
pub enum BackendMessage {
    Response {
        id: u64,
        result: Option<Value>,
        error: Option<Value>,
    },
    Event {
        name: String,
        params: Value,
    },
}

impl BackendMessage {
    /// Short description for logging
    pub fn summary(&self) -> String {
        match self {
            BackendMessage::Response { id, error: None, .. } => format!("response #{}", id),
            BackendMessage::Response {
                id,
                error: Some(err),
                ..
            } => format!("error response #{}: {}", id, err),
            BackendMessage::Event { name, .. } => format!("event {}", name),
        }
    }
}

/// Parse one line of backend output
///
/// Returns `None` for blank lines, non-JSON output, and responses whose id is
/// not an unsigned integer.
pub fn parse_backend_message(line: &str) -> Option<BackendMessage> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let json = strip_brackets(trimmed).unwrap_or(trimmed);

    match serde_json::from_str::<RawMessage>(json).ok()? {
        RawMessage::Response { id, result, error } => {
            let id = match &id {
                Value::Number(n) => n.as_u64()?,
                Value::String(s) => s.parse().ok()?,
                _ => return None,
            };
            Some(BackendMessage::Response { id, result, error })
        }
        RawMessage::Event { event, params } => Some(BackendMessage::Event {
            name: event,
            params,
        }),
    }
}

/// Forward a backend event into our log
///
/// `log` events carry a `level` and a `message`; any other event is logged at
/// debug with its parameters.
pub fn log_backend_event(name: &str, params: &Value) {
    if name != "log" {
        debug!("backend event {}: {}", name, params);
        return;
    }

    let message = params
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default();
    match params.get("level").and_then(Value::as_str) {
        Some("error") => error!("backend: {}", message),
        Some("warn") | Some("warning") => warn!("backend: {}", message),
        Some("debug") => debug!("backend: {}", message),
        Some("trace") => trace!("backend: {}", message),
        _ => info!("backend: {}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_brackets_valid() {
        assert_eq!(strip_brackets("[{\"id\":1}]"), Some("{\"id\":1}"));
    }

    #[test]
    fn test_strip_brackets_whitespace() {
        assert_eq!(strip_brackets("  [{\"id\":1}]  "), Some("{\"id\":1}"));
    }

    #[test]
    fn test_strip_brackets_invalid() {
        assert_eq!(strip_brackets("{\"id\":1}"), None);
        assert_eq!(strip_brackets("Loading database..."), None);
    }

    #[test]
    fn test_parse_bool_response() {
        let msg = parse_backend_message(r#"[{"id":3,"result":true}]"#).unwrap();
        assert_eq!(
            msg,
            BackendMessage::Response {
                id: 3,
                result: Some(json!(true)),
                error: None
            }
        );
    }

    #[test]
    fn test_parse_unwrapped_response() {
        let msg = parse_backend_message(r#"{"id":4,"result":"/home/user/.psidb"}"#).unwrap();
        assert!(matches!(msg, BackendMessage::Response { id: 4, .. }));
    }

    #[test]
    fn test_parse_error_response() {
        let msg = parse_backend_message(r#"[{"id":5,"error":"database not loaded"}]"#).unwrap();
        match msg {
            BackendMessage::Response { id, result, error } => {
                assert_eq!(id, 5);
                assert!(result.is_none());
                assert_eq!(error, Some(json!("database not loaded")));
            }
            other => panic!("expected response, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_string_id() {
        let msg = parse_backend_message(r#"{"id":"12","result":false}"#).unwrap();
        assert!(matches!(msg, BackendMessage::Response { id: 12, .. }));
    }

    #[test]
    fn test_parse_event() {
        let msg =
            parse_backend_message(r#"[{"event":"log","params":{"level":"info","message":"hi"}}]"#)
                .unwrap();
        match msg {
            BackendMessage::Event { name, params } => {
                assert_eq!(name, "log");
                assert_eq!(params["message"], "hi");
            }
            other => panic!("expected event, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_invalid_lines() {
        assert!(parse_backend_message("").is_none());
        assert!(parse_backend_message("Loading database...").is_none());
        assert!(parse_backend_message(r#"{"id":-1,"result":true}"#).is_none());
    }

    #[test]
    fn test_message_summary() {
        let msg = BackendMessage::Response {
            id: 1,
            result: Some(json!(true)),
            error: None,
        };
        assert_eq!(msg.summary(), "response #1");

        let msg = BackendMessage::Event {
            name: "log".to_string(),
            params: json!({}),
        };
        assert_eq!(msg.summary(), "event log");
    }
}
