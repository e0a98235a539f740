//! MCP Tool definitions and handlers
//!
//! Defines the tool catalog and dispatches calls to it.

use serde_json::{json, Value};

use crate::datetime::{current_datetime, DateTimeArgs, OutputFormat};
use crate::error::McpError;
use crate::mcp::types::{CallToolResult, JsonRpcError, Tool};

/// Name of the only registered tool
pub const GET_CURRENT_DATETIME: &str = "get_current_datetime";

const GET_CURRENT_DATETIME_DESCRIPTION: &str = "Get the current date and time in various formats";

/// Prefix of every recovered formatting error
const DATETIME_ERROR_PREFIX: &str = "Error getting date and time: ";

/// Result of dispatching a tool call.
///
/// Domain failures are carried inside `Success` as an envelope with
/// `is_error` set; only protocol misuse becomes a `ProtocolFault`.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(CallToolResult),
    ProtocolFault(JsonRpcError),
}

impl From<McpError> for JsonRpcError {
    fn from(err: McpError) -> Self {
        match err {
            McpError::UnknownTool { name } => JsonRpcError::unknown_tool(name),
        }
    }
}

/// Tool registry
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    /// Create the registry with its fixed catalog
    pub fn new() -> Self {
        Self {
            tools: vec![tool_def(
                GET_CURRENT_DATETIME,
                GET_CURRENT_DATETIME_DESCRIPTION,
                get_current_datetime_schema(),
            )],
        }
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.clone()
    }

    /// Call a tool by name
    pub fn call_tool(&self, name: &str, args: Value) -> ToolOutcome {
        match name {
            GET_CURRENT_DATETIME => ToolOutcome::Success(self.handle_get_current_datetime(args)),
            _ => {
                tracing::warn!("Rejected call to unknown tool '{}'", name);
                ToolOutcome::ProtocolFault(
                    McpError::UnknownTool {
                        name: name.to_string(),
                    }
                    .into(),
                )
            }
        }
    }

    // ==================== Tool Handlers ====================

    fn handle_get_current_datetime(&self, args: Value) -> CallToolResult {
        match render_current_datetime(args) {
            Ok(text) => CallToolResult::text(text),
            Err(message) => {
                tracing::debug!("get_current_datetime failed: {}", message);
                CallToolResult::error(format!("{}{}", DATETIME_ERROR_PREFIX, message))
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn render_current_datetime(args: Value) -> Result<String, String> {
    let args = DateTimeArgs::from_value(args).map_err(|e| e.to_string())?;
    let report = current_datetime(&args).map_err(|e| e.to_string())?;
    report.to_pretty_json().map_err(|e| e.to_string())
}

// ==================== Tool Schemas ====================

fn tool_def(name: &str, description: &str, input_schema: Value) -> Tool {
    Tool {
        name: name.to_string(),
        description: Some(description.to_string()),
        input_schema,
    }
}

fn get_current_datetime_schema() -> Value {
    let formats: Vec<&str> = OutputFormat::ALL.iter().map(OutputFormat::as_str).collect();

    json!({
        "type": "object",
        "properties": {
            "format": {
                "type": "string",
                "description": "Format of the date and time (iso, locale, unix)",
                "enum": formats
            },
            "timezone": {
                "type": "string",
                "description": "Timezone for the date and time (e.g., \"America/New_York\", \"Europe/London\")"
            }
        },
        "additionalProperties": false
    })
}
