//! JSON-RPC delivery of store change events.

use crate::models::GIST_URI_PREFIX;
use crate::store::ChangeNotifier;
use crate::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

/// Output channel shared by responses and notifications.
///
/// One line is written per message while holding the lock, so messages
/// never interleave.
pub type SharedOutput = Arc<Mutex<dyn Write + Send>>;

/// Returns a [`SharedOutput`] over process stdout.
#[must_use]
pub fn stdout_output() -> SharedOutput {
    Arc::new(Mutex::new(std::io::stdout()))
}

/// Writes one JSON-RPC message followed by a newline and flushes.
///
/// # Errors
///
/// Returns an error if writing or flushing fails.
pub fn write_message(output: &SharedOutput, message: &str) -> Result<()> {
    let mut out = output.lock().unwrap_or_else(PoisonError::into_inner);
    writeln!(out, "{message}").map_err(|e| Error::OperationFailed {
        operation: "write_stdout".to_string(),
        cause: e.to_string(),
    })?;
    out.flush().map_err(|e| Error::OperationFailed {
        operation: "flush_stdout".to_string(),
        cause: e.to_string(),
    })
}

/// JSON-RPC notification.
#[derive(Debug, Serialize)]
struct JsonRpcNotification<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

/// Sends store change events to the client as MCP notifications.
pub struct JsonRpcNotifier {
    output: SharedOutput,
}

impl JsonRpcNotifier {
    /// Method announcing a changed resource list.
    pub const RESOURCE_LIST_CHANGED: &'static str = "notifications/resources/list_changed";
    /// Method announcing a changed subscribed resource.
    pub const RESOURCE_UPDATED: &'static str = "notifications/resources/updated";
    /// Method announcing a changed prompt list.
    pub const PROMPT_LIST_CHANGED: &'static str = "notifications/prompts/list_changed";

    /// Creates a notifier writing to `output`.
    #[must_use]
    pub const fn new(output: SharedOutput) -> Self {
        Self { output }
    }

    fn send(&self, method: &str, params: Option<Value>) {
        let notification = JsonRpcNotification {
            jsonrpc: "2.0",
            method,
            params,
        };
        let result = serde_json::to_string(&notification)
            .map_err(|e| Error::OperationFailed {
                operation: "encode_notification".to_string(),
                cause: e.to_string(),
            })
            .and_then(|line| write_message(&self.output, &line));

        if let Err(e) = result {
            tracing::warn!(method, error = %e, "Failed to send notification");
        }
    }
}

impl ChangeNotifier for JsonRpcNotifier {
    fn resource_list_changed(&self) {
        self.send(Self::RESOURCE_LIST_CHANGED, None);
    }

    fn resource_changed(&self, gist_id: &str) {
        self.send(
            Self::RESOURCE_UPDATED,
            Some(serde_json::json!({ "uri": format!("{GIST_URI_PREFIX}{gist_id}") })),
        );
    }

    fn prompt_list_changed(&self) {
        self.send(Self::PROMPT_LIST_CHANGED, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(output: &Arc<Mutex<Vec<u8>>>) -> Vec<Value> {
        String::from_utf8(output.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_notifications_are_jsonrpc_lines() {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let notifier = JsonRpcNotifier::new(buffer.clone());

        notifier.resource_list_changed();
        notifier.resource_changed("abc");
        notifier.prompt_list_changed();

        let messages = captured(&buffer);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["method"], "notifications/resources/list_changed");
        assert!(messages[0].get("params").is_none());
        assert_eq!(messages[1]["method"], "notifications/resources/updated");
        assert_eq!(messages[1]["params"]["uri"], "gist:///abc");
        assert_eq!(messages[2]["method"], "notifications/prompts/list_changed");
        assert!(messages.iter().all(|m| m["jsonrpc"] == "2.0" && m.get("id").is_none()));
    }
}
