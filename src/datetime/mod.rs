//! Date and time module
//!
//! Argument model and formatters behind the `get_current_datetime` tool.

pub mod format;
pub mod types;

pub use format::{current_datetime, format_instant, report_at};
pub use types::{DateTimeArgs, DateTimeReport, OutputFormat};
