//! MCP server implementation.
//!
//! Newline-delimited JSON-RPC 2.0 over stdio. Each request runs in its own
//! task; responses go through a single writer task so lines never interleave.

use crate::context::ToolContext;
use crate::error::McpError;
use crate::protocol::*;
use crate::resources;
use crate::tools::ToolRegistry;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use wikijs_core::{ToolError, format_for_display};

/// Name reported in `initialize`.
pub const SERVER_NAME: &str = "wikijs-mcp";

const RESPONSE_QUEUE: usize = 100;

/// The MCP server.
#[derive(Clone)]
pub struct McpServer {
    tools: Arc<ToolRegistry>,
    ctx: ToolContext,
}

impl McpServer {
    pub fn new(tools: ToolRegistry, ctx: ToolContext) -> Self {
        Self {
            tools: Arc::new(tools),
            ctx,
        }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Run the server on the process's stdin and stdout.
    pub async fn run_stdio(self) -> Result<(), McpError> {
        tracing::info!(tools = self.tools.len(), "Starting MCP server with stdio transport");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve requests from `reader` until EOF, writing responses to `writer`.
    ///
    /// Returns once every in-flight request has been answered.
    pub async fn serve<R, W>(self, reader: R, mut writer: W) -> Result<(), McpError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<String>(RESPONSE_QUEUE);

        let writer_task = tokio::spawn(async move {
            while let Some(line) = rx.recv().await {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            Ok::<(), std::io::Error>(())
        });

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let server = self.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let Some(response) = server.handle_line(&line).await else {
                    return;
                };
                match serde_json::to_string(&response) {
                    Ok(encoded) => {
                        if tx.send(encoded).await.is_err() {
                            tracing::warn!("Response writer closed; dropping response");
                        }
                    }
                    Err(e) => tracing::error!(error = %e, "Failed to encode response"),
                }
            });
        }

        tracing::info!("Input closed; draining in-flight requests");
        drop(tx);
        writer_task.await.map_err(std::io::Error::other)??;
        Ok(())
    }

    /// Handle one raw input line. `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "Unparsable input line");
                return Some(JsonRpcResponse::error(
                    None,
                    codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        let id = value.get("id").cloned();
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(JsonRpcResponse::error(
                id,
                codes::INVALID_REQUEST,
                format!("Invalid request: {}", e),
            )),
        }
    }

    /// Handle a JSON-RPC request. `None` for notifications.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!(method = %request.method, "Notification received");
            return None;
        }

        let id = request.id.clone();
        tracing::debug!(method = %request.method, "Handling request");

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params).await,
            "resources/list" => JsonRpcResponse::success(id, json!({ "resources": resources::list() })),
            "resources/read" => self.handle_read_resource(id, request.params),
            "shutdown" => JsonRpcResponse::success(id, Value::Null),
            _ => JsonRpcResponse::error(
                id,
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            "capabilities": {
                "tools": {
                    "listChanged": false
                },
                "resources": {}
            }
        });
        JsonRpcResponse::success(id, result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "tools": self.tools.list() }))
    }

    async fn handle_call_tool(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match params.map(serde_json::from_value) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    codes::INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                );
            }
            None => return JsonRpcResponse::error(id, codes::INVALID_PARAMS, "Missing params"),
        };

        let name = params.name;
        let arguments = params.arguments.unwrap_or_else(|| json!({}));

        // A panicking tool must still produce an envelope.
        let tools = self.tools.clone();
        let ctx = self.ctx.clone();
        let task_name = name.clone();
        let result = match tokio::spawn(async move { tools.call(&ctx, &task_name, arguments).await }).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(tool = %name, error = %e, "Tool task failed");
                format_for_display(
                    &ToolError::Unexpected(e.to_string()),
                    &format!("call {}", name),
                )
            }
        };

        match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(
                id,
                codes::INTERNAL_ERROR,
                format!("Failed to encode tool result: {}", e),
            ),
        }
    }

    fn handle_read_resource(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ReadResourceParams = match params.map(serde_json::from_value) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    codes::INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                );
            }
            None => return JsonRpcResponse::error(id, codes::INVALID_PARAMS, "Missing params"),
        };

        match resources::read(&params.uri) {
            Some(contents) => JsonRpcResponse::success(id, contents),
            None => JsonRpcResponse::error(
                id,
                codes::INVALID_PARAMS,
                format!("Unknown resource: {}", params.uri),
            ),
        }
    }
}
