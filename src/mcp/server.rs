//! MCP server setup and lifecycle.
//!
//! Implements a line-delimited JSON-RPC server over stdio. Responses and the
//! change notifications emitted by the stores share one output channel.

use crate::config::FeatureFlags;
use crate::mcp::context::GistContext;
use crate::mcp::dispatch::McpMethod;
use crate::mcp::notifier::{SharedOutput, stdout_output, write_message};
use crate::mcp::resources::GistUri;
use crate::mcp::{PromptRegistry, ResourceHandler, ToolRegistry};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::{BufRead, BufReader, Write};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Instant;
use tracing::info_span;

/// MCP protocol version.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name.
const SERVER_NAME: &str = "gistpad";

/// Usage hints returned from `initialize`.
const INSTRUCTIONS: &str = "Gistpad manages the user's GitHub Gists: notes, daily todos and \
reusable prompts. Gists are exposed as gist:/// resources. Use list_gists to find a gist \
before editing it, get_todays_note for today's daily note, and refresh_gists after changes \
made outside this server.";

/// How a [`ServerSession`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The client closed the input stream.
    InputClosed,
    /// An [`Interrupter`] asked the session to stop.
    Interrupted,
}

enum SessionEvent {
    Finished(Result<()>),
    Interrupted,
}

/// A server running on a background thread.
pub struct ServerSession {
    tx: mpsc::Sender<SessionEvent>,
    rx: mpsc::Receiver<SessionEvent>,
    output: SharedOutput,
}

impl ServerSession {
    /// Returns a handle that stops [`ServerSession::wait`] from another
    /// thread, such as a signal handler.
    #[must_use]
    pub fn interrupter(&self) -> Interrupter {
        Interrupter(self.tx.clone())
    }

    /// Blocks until the input closes or the session is interrupted, then
    /// flushes the output channel.
    ///
    /// A request already being handled when the interrupt arrives may still
    /// write its response; the reader thread is not joined because it can
    /// stay blocked on stdin.
    ///
    /// # Errors
    ///
    /// Returns the serve loop's error, or an error if flushing fails.
    pub fn wait(self) -> Result<SessionEnd> {
        let ended = match self.rx.recv() {
            Ok(SessionEvent::Finished(result)) => result.map(|()| SessionEnd::InputClosed),
            Ok(SessionEvent::Interrupted) => Ok(SessionEnd::Interrupted),
            // Unreachable while `self.tx` is alive.
            Err(_) => Ok(SessionEnd::InputClosed),
        };
        flush_output(&self.output)?;
        ended
    }
}

/// Stops a [`ServerSession`]. Cheap to clone.
#[derive(Clone)]
pub struct Interrupter(mpsc::Sender<SessionEvent>);

impl Interrupter {
    /// Asks the session to stop. Later calls are ignored.
    pub fn interrupt(&self) {
        // The receiver is gone once the session has ended.
        let _ = self.0.send(SessionEvent::Interrupted);
    }
}

fn flush_output(output: &SharedOutput) -> Result<()> {
    let mut out = output.lock().map_err(|e| Error::OperationFailed {
        operation: "flush_output".to_string(),
        cause: e.to_string(),
    })?;
    out.flush().map_err(|e| Error::OperationFailed {
        operation: "flush_output".to_string(),
        cause: e.to_string(),
    })
}

/// MCP server for gistpad.
pub struct McpServer {
    /// Tool registry.
    tools: ToolRegistry,
    /// Resource handler.
    resources: ResourceHandler,
    /// Prompt registry.
    prompts: PromptRegistry,
    /// Enabled features.
    features: FeatureFlags,
    /// Channel for responses.
    output: SharedOutput,
}

impl McpServer {
    /// Creates a server over a shared context, writing to stdout.
    #[must_use]
    pub fn new(context: Arc<GistContext>) -> Self {
        Self {
            tools: ToolRegistry::new(Arc::clone(&context)),
            resources: ResourceHandler::new(Arc::clone(&context)),
            prompts: PromptRegistry::new(Arc::clone(&context.gists)),
            features: context.features,
            output: stdout_output(),
        }
    }

    /// Sets the response channel.
    ///
    /// Use the same channel as the [`JsonRpcNotifier`](crate::mcp::JsonRpcNotifier)
    /// so notifications and responses never interleave mid-line.
    #[must_use]
    pub fn with_output(mut self, output: SharedOutput) -> Self {
        self.output = output;
        self
    }

    /// Serves stdin on a background thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn_stdio(self) -> Result<ServerSession> {
        self.spawn(BufReader::new(std::io::stdin()))
    }

    /// Serves `reader` on a background thread.
    ///
    /// The returned session ends when the input closes or when an
    /// [`Interrupter`] fires, whichever comes first.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn<R: BufRead + Send + 'static>(self, reader: R) -> Result<ServerSession> {
        let (tx, rx) = mpsc::channel::<SessionEvent>();
        let output = Arc::clone(&self.output);
        let finished = tx.clone();

        thread::Builder::new()
            .name("gistpad-stdio".to_string())
            .spawn(move || {
                let result = self.serve(reader);
                // The session may already have ended on an interrupt.
                let _ = finished.send(SessionEvent::Finished(result));
            })
            .map_err(|e| Error::OperationFailed {
                operation: "spawn_server_thread".to_string(),
                cause: e.to_string(),
            })?;

        Ok(ServerSession { tx, rx, output })
    }

    /// Serves requests read line by line from `reader` until EOF.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    pub fn serve<R: BufRead>(&self, reader: R) -> Result<()> {
        tracing::info!(server = SERVER_NAME, "MCP server listening on stdio");

        for line in reader.lines() {
            let line = line.map_err(|e| Error::OperationFailed {
                operation: "read_stdin".to_string(),
                cause: e.to_string(),
            })?;

            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_request(&line) {
                write_message(&self.output, &response)?;
            }
        }

        tracing::info!("Input closed, MCP server stopping");
        Ok(())
    }

    /// Handles one JSON-RPC message.
    ///
    /// Returns `None` for notifications and for requests without an id.
    #[must_use]
    pub fn handle_request(&self, request: &str) -> Option<String> {
        let start = Instant::now();
        let span = info_span!(
            "mcp.request",
            rpc.method = tracing::field::Empty,
            rpc.id = tracing::field::Empty,
            status = tracing::field::Empty
        );
        let _guard = span.enter();

        let req: JsonRpcRequest = match serde_json::from_str(request) {
            Ok(req) => req,
            Err(e) => {
                span.record("status", "parse_error");
                metrics::counter!(
                    "mcp_requests_total",
                    "method" => "parse_error",
                    "status" => "error"
                )
                .increment(1);
                return Some(format_error(None, -32700, &format!("Parse error: {e}")));
            },
        };

        span.record("rpc.method", req.method.as_str());
        if let Some(id) = &req.id {
            let id_str = id.to_string();
            span.record("rpc.id", id_str.as_str());
        }

        let method = McpMethod::from(req.method.as_str());
        if let McpMethod::Notification(name) = &method {
            tracing::debug!(notification = %name, "Received client notification");
            return None;
        }

        tracing::info!(method = %req.method, "Processing MCP request");

        let result = self.dispatch_method(&method, req.params);
        let status_label = if result.is_ok() { "success" } else { "error" };
        span.record("status", status_label);

        let method_label = if method.is_known() {
            method.as_str().to_string()
        } else {
            "unknown".to_string()
        };
        metrics::counter!(
            "mcp_requests_total",
            "method" => method_label.clone(),
            "status" => status_label
        )
        .increment(1);
        metrics::histogram!("mcp_request_duration_ms", "method" => method_label)
            .record(start.elapsed().as_secs_f64() * 1000.0);

        match req.id {
            Some(id) => Some(format_response(Some(id), result)),
            None => {
                tracing::debug!(method = %req.method, "Request without id, no response sent");
                None
            },
        }
    }

    /// Dispatches a method call.
    fn dispatch_method(&self, method: &McpMethod, params: Option<Value>) -> DispatchResult {
        if method.is_prompt_method() && !self.features.include_prompts {
            return Err((-32601, format!("Method not found: {method}")));
        }

        match method {
            McpMethod::Initialize => Ok(self.handle_initialize()),
            McpMethod::Ping => Ok(serde_json::json!({})),
            McpMethod::ListTools => Ok(self.handle_list_tools()),
            McpMethod::CallTool => self.handle_call_tool(params),
            McpMethod::ListResources => self.handle_list_resources(),
            McpMethod::ReadResource => self.handle_read_resource(params),
            McpMethod::ListResourceTemplates => Ok(serde_json::json!({
                "resourceTemplates": self.resources.list_templates()
            })),
            McpMethod::Subscribe => self.handle_subscription(params, true),
            McpMethod::Unsubscribe => self.handle_subscription(params, false),
            McpMethod::ListPrompts => self.handle_list_prompts(),
            McpMethod::GetPrompt => self.handle_get_prompt(params),
            McpMethod::Notification(name) | McpMethod::Unknown(name) => {
                Err((-32601, format!("Method not found: {name}")))
            },
        }
    }

    /// Handles the initialize method.
    fn handle_initialize(&self) -> Value {
        let mut capabilities = serde_json::json!({
            "resources": {
                "subscribe": true,
                "listChanged": true
            },
            "tools": {
                "listChanged": false
            }
        });
        if self.features.include_prompts {
            capabilities["prompts"] = serde_json::json!({ "listChanged": true });
        }

        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": capabilities,
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            },
            "instructions": INSTRUCTIONS
        })
    }

    /// Handles tools/list.
    fn handle_list_tools(&self) -> Value {
        let tools: Vec<Value> = self
            .tools
            .list_tools()
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect();

        serde_json::json!({ "tools": tools })
    }

    /// Handles tools/call.
    ///
    /// Tool failures are reported in the result with `isError`, never as
    /// JSON-RPC errors.
    fn handle_call_tool(&self, params: Option<Value>) -> DispatchResult {
        let params = params.ok_or((-32602, "Missing params".to_string()))?;

        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or((-32602, "Missing tool name".to_string()))?;
        let tool_name = name.to_string();
        let span = info_span!("mcp.tool.call", tool.name = tool_name.as_str());
        let _guard = span.enter();
        let start = Instant::now();

        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or(serde_json::json!({}));

        let (result, status_label) = match self.tools.execute(name, arguments) {
            Ok(result) => {
                let status_label = if result.is_error { "error" } else { "success" };
                (
                    serde_json::json!({
                        "content": result.content,
                        "isError": result.is_error
                    }),
                    status_label,
                )
            },
            Err(e) => {
                tracing::warn!(tool = %tool_name, error = %e, "Tool call failed");
                (
                    serde_json::json!({
                        "content": [{ "type": "text", "text": e.to_string() }],
                        "isError": true
                    }),
                    "error",
                )
            },
        };
        metrics::counter!(
            "mcp_tool_calls_total",
            "tool" => tool_name.clone(),
            "status" => status_label
        )
        .increment(1);
        metrics::histogram!(
            "mcp_tool_duration_ms",
            "tool" => tool_name,
            "status" => status_label
        )
        .record(start.elapsed().as_secs_f64() * 1000.0);

        Ok(result)
    }

    /// Handles resources/list.
    fn handle_list_resources(&self) -> DispatchResult {
        let resources = self.resources.list_resources().map_err(into_rpc_error)?;
        Ok(serde_json::json!({ "resources": resources }))
    }

    /// Handles resources/read.
    fn handle_read_resource(&self, params: Option<Value>) -> DispatchResult {
        let uri = required_str(params.as_ref(), "uri", "Missing resource URI")?;

        let resource_kind = GistUri::parse(uri).map_or("invalid", |parsed| parsed.kind());
        let span = info_span!(
            "mcp.resource.read",
            resource.uri = uri,
            resource.kind = resource_kind,
            status = tracing::field::Empty
        );
        let _guard = span.enter();
        let start = Instant::now();

        let result = self
            .resources
            .read_resource(uri)
            .map(|content| serde_json::json!({ "contents": [content] }))
            .map_err(into_rpc_error);

        let status_label = if result.is_ok() { "success" } else { "error" };
        span.record("status", status_label);
        metrics::counter!(
            "mcp_resource_reads_total",
            "resource_kind" => resource_kind,
            "status" => status_label
        )
        .increment(1);
        metrics::histogram!(
            "mcp_resource_read_duration_ms",
            "resource_kind" => resource_kind,
            "status" => status_label
        )
        .record(start.elapsed().as_secs_f64() * 1000.0);

        result
    }

    /// Handles resources/subscribe and resources/unsubscribe.
    fn handle_subscription(&self, params: Option<Value>, subscribe: bool) -> DispatchResult {
        let uri = required_str(params.as_ref(), "uri", "Missing resource URI")?;

        let result = if subscribe {
            self.resources.subscribe(uri)
        } else {
            self.resources.unsubscribe(uri)
        };
        result.map_err(into_rpc_error)?;

        tracing::debug!(uri, subscribe, "Updated resource subscription");
        Ok(serde_json::json!({}))
    }

    /// Handles prompts/list.
    fn handle_list_prompts(&self) -> DispatchResult {
        let prompts = self.prompts.list_prompts().map_err(into_rpc_error)?;
        Ok(serde_json::json!({ "prompts": prompts }))
    }

    /// Handles prompts/get.
    fn handle_get_prompt(&self, params: Option<Value>) -> DispatchResult {
        let name = required_str(params.as_ref(), "name", "Missing prompt name")?;
        let span = info_span!("mcp.prompt.get", prompt.name = name);
        let _guard = span.enter();

        let arguments: Map<String, Value> = params
            .as_ref()
            .and_then(|p| p.get("arguments"))
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let messages = self
            .prompts
            .get_prompt_messages(name, &arguments)
            .map_err(into_rpc_error)?;

        Ok(serde_json::json!({ "messages": messages }))
    }
}

/// Extracts a required string parameter.
fn required_str<'a>(
    params: Option<&'a Value>,
    key: &str,
    missing: &str,
) -> std::result::Result<&'a str, (i32, String)> {
    let params = params.ok_or((-32602, "Missing params".to_string()))?;
    params
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| (-32602, missing.to_string()))
}

/// Maps a crate error to a JSON-RPC error code and message.
fn into_rpc_error(error: Error) -> (i32, String) {
    let code = if error.is_invalid_params() {
        -32602
    } else {
        -32603
    };
    (code, error.to_string())
}

/// Formats a response.
fn format_response(id: Option<Value>, result: DispatchResult) -> String {
    match result {
        Ok(value) => {
            let response = JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(value),
                error: None,
            };
            serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
        },
        Err((code, message)) => format_error(id, code, &message),
    }
}

/// Formats an error response.
fn format_error(id: Option<Value>, code: i32, message: &str) -> String {
    let response = JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message: message.to_string(),
            data: None,
        }),
    };
    serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
}

/// Result type for method dispatch.
type DispatchResult = std::result::Result<Value, (i32, String)>;

/// JSON-RPC request.
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    /// JSON-RPC version (required by protocol but not used in code).
    #[serde(rename = "jsonrpc")]
    _jsonrpc: String,
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

/// JSON-RPC response.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error.
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}
