//! DateTime MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing the current date and time.
//! Provides a single tool that formats "now" as ISO-8601, a localized
//! string, or a Unix timestamp.

pub mod config;
pub mod datetime;
pub mod error;
pub mod mcp;

pub use config::Config;
pub use error::{DateTimeMcpError, Result};
