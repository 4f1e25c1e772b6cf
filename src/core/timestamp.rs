//! Timestamp formatting utilities
//!
//! Resolves the configured time-format string into a concrete format once,
//! at logger construction. Supports ISO 8601, RFC 3339, Unix timestamps,
//! and arbitrary strftime patterns.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::str::FromStr;

/// Standardized timestamp format options
///
/// # Examples
///
/// ```
/// use dynamic_logger::core::TimestampFormat;
///
/// let format: TimestampFormat = "unix-millis".parse().unwrap();
/// assert!(format.is_numeric());
///
/// // Anything that is not a well-known name is a strftime pattern
/// let format: TimestampFormat = "%d/%b/%Y:%H:%M:%S".parse().unwrap();
/// assert_eq!(format, TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S".to_string()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Unix timestamp in microseconds: `1736332245123456`
    UnixMicros,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    /// Format a `DateTime<Utc>` according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::UnixMicros => datetime.timestamp_micros().to_string(),
            TimestampFormat::Custom(format_str) => {
                let mut out = String::new();
                if write!(out, "{}", datetime.format(format_str)).is_err() {
                    return TimestampFormat::Iso8601.format(datetime);
                }
                out
            }
        }
    }

    /// Format as a JSON value: numbers for Unix formats, strings otherwise
    #[must_use]
    pub fn format_json(&self, datetime: &DateTime<Utc>) -> serde_json::Value {
        match self {
            TimestampFormat::Unix => serde_json::Value::Number(datetime.timestamp().into()),
            TimestampFormat::UnixMillis => {
                serde_json::Value::Number(datetime.timestamp_millis().into())
            }
            TimestampFormat::UnixMicros => {
                serde_json::Value::Number(datetime.timestamp_micros().into())
            }
            _ => serde_json::Value::String(self.format(datetime)),
        }
    }

    /// Check if this is a Unix-based numeric format
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TimestampFormat::Unix | TimestampFormat::UnixMillis | TimestampFormat::UnixMicros
        )
    }
}

impl FromStr for TimestampFormat {
    type Err = String;

    /// Empty input selects the default. Unknown names are taken as
    /// strftime patterns, which must contain at least one `%` directive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        match normalized.as_str() {
            "" | "iso8601" => Ok(TimestampFormat::Iso8601),
            "iso8601-micros" => Ok(TimestampFormat::Iso8601Micros),
            "rfc3339" => Ok(TimestampFormat::Rfc3339),
            "unix" => Ok(TimestampFormat::Unix),
            "unix-millis" => Ok(TimestampFormat::UnixMillis),
            "unix-micros" => Ok(TimestampFormat::UnixMicros),
            _ if s.contains('%') => {
                if StrftimeItems::new(s).any(|item| matches!(item, Item::Error)) {
                    return Err(format!("Invalid strftime pattern: '{}'", s));
                }
                Ok(TimestampFormat::Custom(s.to_string()))
            }
            _ => Err(format!("Invalid time format: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_iso8601_format() {
        let format = TimestampFormat::Iso8601;
        let result = format.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123Z");
    }

    #[test]
    fn test_iso8601_micros_format() {
        let format = TimestampFormat::Iso8601Micros;
        let result = format.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123456Z");
    }

    #[test]
    fn test_rfc3339_format() {
        let format = TimestampFormat::Rfc3339;
        let result = format.format(&fixed_datetime());
        assert!(result.starts_with("2025-01-08T10:30:45"));
        assert!(result.contains("+00:00") || result.ends_with('Z'));
    }

    #[test]
    fn test_unix_millis_json_is_number() {
        let value = TimestampFormat::UnixMillis.format_json(&fixed_datetime());
        assert_eq!(value, serde_json::json!(1736332245123i64));

        let value = TimestampFormat::Iso8601.format_json(&fixed_datetime());
        assert_eq!(value, serde_json::json!("2025-01-08T10:30:45.123Z"));
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string());
        let result = format.format(&fixed_datetime());
        assert_eq!(result, "2025/01/08 10:30");
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("".parse::<TimestampFormat>(), Ok(TimestampFormat::Iso8601));
        assert_eq!("RFC3339".parse::<TimestampFormat>(), Ok(TimestampFormat::Rfc3339));
        assert_eq!(
            "unix_micros".parse::<TimestampFormat>(),
            Ok(TimestampFormat::UnixMicros)
        );
        assert_eq!(
            "%H:%M".parse::<TimestampFormat>(),
            Ok(TimestampFormat::Custom("%H:%M".to_string()))
        );
        assert!("yesterday".parse::<TimestampFormat>().is_err());
        assert!("%Y-%!".parse::<TimestampFormat>().is_err());
    }
}
