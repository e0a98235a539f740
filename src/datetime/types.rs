//! Date/time tool type definitions
//!
//! Arguments accepted by the tool and the report it returns.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DateTimeError;

/// Label used for the `timezone` field when the caller supplied none
pub const DEFAULT_TIMEZONE_LABEL: &str = "UTC";

/// Output representation for the current instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// ISO-8601 extended UTC with milliseconds
    #[default]
    Iso,

    /// Human readable, localized string
    Locale,

    /// Whole seconds since the Unix epoch
    Unix,
}

impl OutputFormat {
    /// All formats, in the order advertised by the input schema
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Iso, OutputFormat::Locale, OutputFormat::Unix];

    /// Look up a format by its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    /// Wire name of the format
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Iso => "iso",
            OutputFormat::Locale => "locale",
            OutputFormat::Unix => "unix",
        }
    }
}

/// Validated tool arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateTimeArgs {
    /// Requested output format (unknown names resolve to `Iso`)
    pub format: OutputFormat,

    /// Format name as the caller sent it, echoed back in the report
    pub format_name: Option<String>,

    /// IANA timezone identifier, checked only when the locale formatter uses it
    pub timezone: Option<String>,
}

impl DateTimeArgs {
    /// Build arguments from the raw JSON `arguments` object of a tool call.
    ///
    /// A missing or `null` value yields the defaults. Empty strings count as
    /// absent. Unrecognized format names fall back to ISO rather than failing.
    pub fn from_value(value: Value) -> Result<Self, DateTimeError> {
        #[derive(Deserialize)]
        struct Args {
            #[serde(default)]
            format: Option<String>,
            #[serde(default)]
            timezone: Option<String>,
        }

        if value.is_null() {
            return Ok(Self::default());
        }

        let args: Args = serde_json::from_value(value).map_err(|e| DateTimeError::InvalidArguments {
            message: e.to_string(),
        })?;

        let format_name = args.format.filter(|name| !name.is_empty());
        let format = match format_name.as_deref() {
            None => OutputFormat::default(),
            Some(name) => OutputFormat::from_name(name).unwrap_or_else(|| {
                tracing::debug!("Unrecognized format '{}', using iso", name);
                OutputFormat::default()
            }),
        };

        Ok(Self {
            format,
            format_name,
            timezone: args.timezone.filter(|tz| !tz.is_empty()),
        })
    }

    /// Format label reported back to the caller
    pub fn format_label(&self) -> &str {
        self.format_name.as_deref().unwrap_or(self.format.as_str())
    }

    /// Timezone label reported back to the caller
    pub fn timezone_label(&self) -> &str {
        self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE_LABEL)
    }
}

/// Successful tool payload.
///
/// Field order is part of the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeReport {
    /// Formatted date/time
    pub datetime: String,

    /// Requested format name, or "iso" when none was given
    pub format: String,

    /// Requested timezone, or "UTC" when none was given
    pub timezone: String,

    /// Epoch milliseconds of the captured instant
    pub timestamp: i64,
}

impl DateTimeReport {
    /// Pretty-print with 2-space indentation
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_names() {
        assert_eq!(OutputFormat::from_name("iso"), Some(OutputFormat::Iso));
        assert_eq!(OutputFormat::from_name("locale"), Some(OutputFormat::Locale));
        assert_eq!(OutputFormat::from_name("unix"), Some(OutputFormat::Unix));
        assert_eq!(OutputFormat::from_name("ISO"), None);
    }

    #[test]
    fn test_args_defaults() {
        assert_eq!(DateTimeArgs::from_value(Value::Null).unwrap(), DateTimeArgs::default());
        assert_eq!(DateTimeArgs::from_value(json!({})).unwrap(), DateTimeArgs::default());
    }

    #[test]
    fn test_args_unknown_format_falls_back_to_iso() {
        let args = DateTimeArgs::from_value(json!({"format": "bogus"})).unwrap();
        assert_eq!(args.format, OutputFormat::Iso);
        assert_eq!(args.format_label(), "bogus");
    }

    #[test]
    fn test_args_empty_strings_are_absent() {
        let args = DateTimeArgs::from_value(json!({"format": "", "timezone": ""})).unwrap();
        assert_eq!(args.format, OutputFormat::Iso);
        assert_eq!(args.timezone, None);
        assert_eq!(args.format_label(), "iso");
        assert_eq!(args.timezone_label(), "UTC");
    }

    #[test]
    fn test_args_timezone_kept() {
        let args = DateTimeArgs::from_value(json!({"format": "locale", "timezone": "Asia/Tokyo"}))
            .unwrap();
        assert_eq!(args.format, OutputFormat::Locale);
        assert_eq!(args.timezone_label(), "Asia/Tokyo");
    }

    #[test]
    fn test_args_wrong_types_rejected() {
        let err = DateTimeArgs::from_value(json!({"timezone": 42})).unwrap_err();
        assert!(matches!(err, DateTimeError::InvalidArguments { .. }));

        assert!(DateTimeArgs::from_value(json!("iso")).is_err());
    }

    #[test]
    fn test_report_key_order() {
        let report = DateTimeReport {
            datetime: "1709993107".to_string(),
            format: "unix".to_string(),
            timezone: "UTC".to_string(),
            timestamp: 1_709_993_107_123,
        };
        let expected = "{\n  \"datetime\": \"1709993107\",\n  \"format\": \"unix\",\n  \"timezone\": \"UTC\",\n  \"timestamp\": 1709993107123\n}";
        assert_eq!(report.to_pretty_json().unwrap(), expected);
    }
}
