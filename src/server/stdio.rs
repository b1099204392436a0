use std::io::{self, BufRead, Write};

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::protocol::{
    tool_result, CallParams, Request, Response, INVALID_PARAMS, INVALID_REQUEST,
    METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION,
};
use super::tools;

pub struct Server {
    name: String,
}

impl Server {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Serve until `reader` reaches EOF. Each non-blank line is one message;
    /// each response is written as one line and flushed. A line that is not
    /// valid UTF-8 gets a parse error reply and the loop carries on.
    pub fn serve<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> io::Result<()> {
        info!(name = %self.name, "serving tools over stdio");
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let response = match std::str::from_utf8(&buf) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    self.handle_line(trimmed)
                }
                Err(e) => {
                    warn!(error = %e, "message is not valid utf-8");
                    let failure =
                        Response::failure(Value::Null, PARSE_ERROR, format!("Parse error: {e}"));
                    serde_json::to_string(&failure).ok()
                }
            };
            if let Some(response) = response {
                writeln!(writer, "{response}")?;
                writer.flush()?;
            }
        }
        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle one raw message. `None` means nothing is sent back.
    pub fn handle_line(&self, line: &str) -> Option<String> {
        let response = match serde_json::from_str::<Value>(line) {
            Ok(message) => self.handle_message(message)?,
            Err(e) => {
                warn!(error = %e, "unparseable message");
                Response::failure(Value::Null, PARSE_ERROR, format!("Parse error: {e}"))
            }
        };
        match serde_json::to_string(&response) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(error = %e, "failed to encode response");
                None
            }
        }
    }

    fn handle_message(&self, message: Value) -> Option<Response> {
        let id = message.get("id").cloned().unwrap_or(Value::Null);
        let request: Request = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "invalid request");
                return Some(Response::failure(id, INVALID_REQUEST, format!("Invalid Request: {e}")));
            }
        };

        if request.method.starts_with("notifications/") || request.is_notification() {
            debug!(method = %request.method, "notification");
            return None;
        }

        debug!(method = %request.method, "request");
        let id = request.id.unwrap_or(Value::Null);
        let response = match request.method.as_str() {
            "initialize" => Response::success(id, self.initialize_result()),
            "ping" => Response::success(id, json!({})),
            "tools/list" => Response::success(id, json!({"tools": tools::definitions()})),
            "tools/call" => self.call(id, request.params),
            other => Response::failure(id, METHOD_NOT_FOUND, format!("Method not found: {other}")),
        };
        Some(response)
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {"name": self.name, "version": env!("CARGO_PKG_VERSION")},
            "capabilities": {"tools": {}}
        })
    }

    /// Tool failures are reported inside the result with `isError` set; only
    /// a missing tool name is a protocol error.
    fn call(&self, id: Value, params: Value) -> Response {
        let params: CallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(_) => return Response::failure(id, INVALID_PARAMS, "Missing tool name in params"),
        };

        debug!(tool = %params.name, "tool call");
        let outcome = tools::call_tool(&params.name, params.arguments.unwrap_or(Value::Null))
            .and_then(tools::ToolOutput::into_text);
        let result = match outcome {
            Ok(text) => tool_result(text, false),
            Err(e) => {
                warn!(tool = %params.name, error = %e, "tool failed");
                tool_result(json!({"error": e.to_string()}).to_string(), true)
            }
        };
        Response::success(id, result)
    }
}
