//! Request loop of the stdio tool server.

use std::io::{BufRead, Write};

use serde_json::{json, Value};

use crate::types::config::Config;
use crate::FructResult;

use super::protocol::{
    CallToolParams, InitializeResult, JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult,
};
use super::tools::ToolHandler;
use super::transport::{LineTransport, StdioTransport};

/// JSON-RPC server exposing the fructose tools.
pub struct McpServer<R, W> {
    transport: LineTransport<R, W>,
    tools: ToolHandler,
    initialized: bool,
}

impl McpServer<std::io::BufReader<std::io::Stdin>, std::io::Stdout> {
    /// Server on stdin/stdout backed by the configured Nutritionix client.
    pub fn new(config: &Config) -> FructResult<Self> {
        Ok(Self::with_transport(
            StdioTransport::stdio(),
            ToolHandler::new(config)?,
        ))
    }
}

impl<R: BufRead, W: Write> McpServer<R, W> {
    pub fn with_transport(transport: LineTransport<R, W>, tools: ToolHandler) -> Self {
        Self {
            transport,
            tools,
            initialized: false,
        }
    }

    /// Serves requests until the input closes.
    pub async fn run(&mut self) -> FructResult<()> {
        tracing::info!("fructcheck tool server starting");

        while let Some(line) = self.transport.read_line()? {
            let Some(response) = self.handle_line(&line).await else {
                continue;
            };

            if let Err(e) = self.transport.write_response(&response) {
                tracing::error!(error = %e, "failed to write response");
            }
        }

        tracing::info!("client disconnected, server stopped");
        Ok(())
    }

    /// Handles one raw line; `None` for notifications.
    async fn handle_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable message");
                return Some(JsonRpcResponse::error(None, JsonRpcError::parse_error(e)));
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                return Some(JsonRpcResponse::error(None, JsonRpcError::invalid_request(e)));
            }
        };

        if request.is_notification() {
            tracing::debug!(method = %request.method, "notification");
            return None;
        }

        Some(self.handle_request(request).await)
    }

    async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::debug!(method = %request.method, "handling request");

        match request.method.as_str() {
            "initialize" => {
                self.initialized = true;
                tracing::info!("client initialized");
                to_response(request.id, InitializeResult::default())
            }
            "initialized" | "notifications/initialized" => {
                JsonRpcResponse::success(request.id, json!({}))
            }
            "shutdown" => {
                self.initialized = false;
                tracing::info!("client requested shutdown");
                JsonRpcResponse::success(request.id, Value::Null)
            }
            "tools/list" => to_response(
                request.id,
                ListToolsResult {
                    tools: ToolHandler::list_tools(),
                },
            ),
            "tools/call" => self.handle_tools_call(request).await,
            _ => JsonRpcResponse::error(request.id, JsonRpcError::method_not_found(&request.method)),
        }
    }

    async fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params: CallToolParams = match request.params.map(serde_json::from_value) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params(format!("Invalid params: {}", e)),
                );
            }
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("Missing params"),
                );
            }
        };

        tracing::info!(tool = %params.name, "calling tool");
        let result = self.tools.handle_tool_call(&params.name, params.arguments).await;

        to_response(request.id, result)
    }

    /// Hands back the transport, e.g. to inspect captured output.
    pub fn into_transport(self) -> LineTransport<R, W> {
        self.transport
    }
}

fn to_response<T: serde::Serialize>(id: Option<JsonRpcId>, result: T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
    }
}
