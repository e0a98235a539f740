//! MCP Server implementation
//!
//! Implements the Model Context Protocol server for stdio transport.
//! Messages are newline-delimited JSON-RPC 2.0, one per line.

use std::future::Future;

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::config::Config;
use crate::error::Result;
use crate::mcp::tools::{ToolOutcome, ToolRegistry};
use crate::mcp::types::*;

/// Line written to stderr once the stdio transport is ready
pub const STARTUP_MESSAGE: &str = "DateTime MCP server running on stdio";

/// Prefix for protocol-layer diagnostics on stderr
pub const ERROR_PREFIX: &str = "[MCP Error]";

/// Why the serve loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// The host closed stdin
    EndOfInput,

    /// An interrupt signal was received
    Interrupted,
}

/// MCP Server for the date/time tool.
///
/// Built once at start-up and passed to the serve loop; holds no state
/// shared between requests beyond the handshake flag.
pub struct McpServer {
    /// Identity reported by `initialize`
    server_info: ServerInfo,

    /// Tool registry
    tool_registry: ToolRegistry,

    /// Whether the client sent `notifications/initialized`
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(config: &Config) -> Self {
        Self {
            server_info: ServerInfo {
                name: config.server_name.clone(),
                version: config.server_version.clone(),
            },
            tool_registry: ToolRegistry::new(),
            initialized: false,
        }
    }

    /// Whether the initialization handshake has completed
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the server on stdio until EOF or Ctrl-C
    pub async fn run_stdio(&mut self) -> Result<ShutdownReason> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();

        eprintln!("{}", STARTUP_MESSAGE);

        self.serve(reader, writer, interrupt()).await
    }

    /// Serve requests from `reader`, writing responses to `writer`, until
    /// the input ends or `shutdown` resolves.
    pub async fn serve<R, W, S>(&mut self, mut reader: R, mut writer: W, shutdown: S) -> Result<ShutdownReason>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        S: Future<Output = ()>,
    {
        let mut buf = Vec::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    return self.shutdown(&mut writer, ShutdownReason::Interrupted).await;
                }
                read = reader.read_until(b'\n', &mut buf) => {
                    if read? == 0 {
                        return self.shutdown(&mut writer, ShutdownReason::EndOfInput).await;
                    }

                    // Invalid UTF-8 degrades to a parse error for this line only
                    let line = String::from_utf8_lossy(&buf).into_owned();
                    buf.clear();

                    if line.trim().is_empty() {
                        continue;
                    }

                    if let Some(response) = self.handle_message(&line).await {
                        write_response(&mut writer, &response).await?;
                    }
                }
            }
        }
    }

    /// Flush pending output and report why the server stopped
    pub async fn shutdown<W>(&mut self, writer: &mut W, reason: ShutdownReason) -> Result<ShutdownReason>
    where
        W: AsyncWrite + Unpin,
    {
        tracing::info!("Shutting down ({:?})", reason);
        writer.flush().await?;
        Ok(reason)
    }

    /// Handle an incoming JSON-RPC message
    pub async fn handle_message(&mut self, message: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => {
                eprintln!("{} Failed to parse message: {}", ERROR_PREFIX, e);
                return Some(JsonRpcResponse::error(None, JsonRpcError::parse_error(e.to_string())));
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(value.clone()) {
            Ok(req) => req,
            Err(e) => {
                eprintln!("{} Invalid request: {}", ERROR_PREFIX, e);
                let id = value.get("id").and_then(|id| serde_json::from_value(id.clone()).ok());
                return Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request(e.to_string())));
            }
        };

        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }

        tracing::debug!("Handling request: {}", request.method);

        let id = request.response_id();
        let response = match request.method.as_str() {
            methods::INITIALIZE => respond(id, &self.handle_initialize(request.params.as_ref())),
            methods::PING => JsonRpcResponse::success(id, serde_json::json!({})),
            methods::LIST_TOOLS => respond(id, &self.handle_list_tools()),
            methods::CALL_TOOL => match self.handle_call_tool(&request) {
                ToolOutcome::Success(result) => respond(id, &result),
                ToolOutcome::ProtocolFault(error) => JsonRpcResponse::error(id, error),
            },
            _ => JsonRpcResponse::error(id, JsonRpcError::method_not_found(&request.method)),
        };

        Some(response)
    }

    fn handle_notification(&mut self, notification: &JsonRpcRequest) {
        match notification.method.as_str() {
            methods::INITIALIZED => {
                self.initialized = true;
                tracing::info!("Client initialized");
            }
            other => tracing::debug!("Ignoring notification: {}", other),
        }
    }

    /// Handle initialize request
    fn handle_initialize(&self, params: Option<&Value>) -> InitializeResult {
        let params: InitializeParams = params
            .and_then(|p| serde_json::from_value(p.clone()).ok())
            .unwrap_or_default();

        if let Some(client) = &params.client_info {
            tracing::info!(
                "Initialize from {} {} (protocol {})",
                client.name,
                client.version.as_deref().unwrap_or("?"),
                params.protocol_version.as_deref().unwrap_or("?")
            );
        }

        InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            server_info: self.server_info.clone(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {},
            },
        }
    }

    /// Handle list tools request
    fn handle_list_tools(&self) -> ListToolsResult {
        ListToolsResult {
            tools: self.tool_registry.list_tools(),
        }
    }

    /// Handle call tool request
    fn handle_call_tool(&self, request: &JsonRpcRequest) -> ToolOutcome {
        let params: CallToolParams = match request.params.as_ref() {
            Some(p) => match serde_json::from_value(p.clone()) {
                Ok(params) => params,
                Err(e) => {
                    return ToolOutcome::ProtocolFault(JsonRpcError::invalid_params(format!(
                        "Invalid tool parameters: {}",
                        e
                    )));
                }
            },
            None => {
                return ToolOutcome::ProtocolFault(JsonRpcError::invalid_params("Missing tool parameters"));
            }
        };

        tracing::debug!("Calling tool: {}", params.name);
        self.tool_registry.call_tool(&params.name, params.arguments)
    }
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for interrupt signal: {}", e);
        std::future::pending::<()>().await;
    }
}

fn respond<T: Serialize>(id: Option<RequestId>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => {
            eprintln!("{} Failed to serialize result: {}", ERROR_PREFIX, e);
            JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string()))
        }
    }
}

async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_string(response)?;
    line.push('\n');

    if let Err(e) = writer.write_all(line.as_bytes()).await {
        eprintln!("{} Failed to write response: {}", ERROR_PREFIX, e);
        return Err(e.into());
    }
    writer.flush().await?;

    Ok(())
}
