//! Error types for the DateTime MCP Server
//!
//! This module defines the error hierarchy for all operations in the server.

use thiserror::Error;

/// Main error type for the DateTime MCP Server
#[derive(Error, Debug)]
pub enum DateTimeMcpError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Date/time formatting errors
    #[error("{0}")]
    DateTime(#[from] DateTimeError),

    /// MCP protocol errors
    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Errors raised while computing or formatting the current date/time.
///
/// These are domain faults: the tool call still succeeds at the protocol
/// level and the message is reported inside the result envelope.
#[derive(Error, Debug)]
pub enum DateTimeError {
    #[error("Invalid time zone specified: {name}")]
    InvalidTimezone { name: String },

    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },
}

/// MCP protocol errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },
}

/// Result type alias for DateTime MCP operations
pub type Result<T> = std::result::Result<T, DateTimeMcpError>;
