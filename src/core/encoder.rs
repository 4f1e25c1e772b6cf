//! Record encoders
//!
//! The configured format token is resolved once, at logger construction,
//! into an [`Encoder`] held by the logger instance:
//! - Text: Human-readable format (default)
//! - Json: Machine-readable JSON, one object per line
//! - KeyValue: logfmt-style `key=value` pairs

use super::error::{LoggerError, Result};
use super::fields::{escape_control, FieldValue};
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use colored::Colorize;
use std::fmt;
use std::str::FromStr;

/// Output format for log entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Example: `2025-01-08T10:30:45.123Z INFO  api main.rs:12 Request processed user=42`
    #[default]
    Text,

    /// Example: `{"ts":"2025-01-08T10:30:45.123Z","level":"info","msg":"Request processed"}`
    Json,

    /// Example: `ts=2025-01-08T10:30:45.123Z level=info msg="Request processed"`
    KeyValue,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::KeyValue => "key-value",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "console" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "key-value" | "keyvalue" | "kv" | "logfmt" => Ok(OutputFormat::KeyValue),
            _ => Err(format!("Unsupported format: '{}'", s)),
        }
    }
}

/// Concrete encoder resolved from configuration
#[derive(Debug, Clone)]
pub struct Encoder {
    format: OutputFormat,
    timestamp_format: TimestampFormat,
    color: bool,
}

impl Encoder {
    pub fn new(format: OutputFormat, timestamp_format: TimestampFormat, color: bool) -> Self {
        Self {
            format,
            timestamp_format,
            color,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Encode a record as a single newline-terminated line
    pub fn encode(&self, entry: &LogEntry) -> Result<String> {
        let mut line = match self.format {
            OutputFormat::Text => self.encode_text(entry),
            OutputFormat::Json => self.encode_json(entry)?,
            OutputFormat::KeyValue => self.encode_key_value(entry),
        };
        line.push('\n');
        Ok(line)
    }

    fn encode_text(&self, entry: &LogEntry) -> String {
        let level = format!("{:5}", entry.level.to_str());
        let level = if self.color {
            level.color(entry.level.color_code()).to_string()
        } else {
            level
        };

        let mut parts = vec![
            escape_control(&self.timestamp_format.format(&entry.timestamp)),
            level,
        ];
        if let Some(ref name) = entry.logger {
            parts.push(escape_control(name));
        }
        if let Some(ref caller) = entry.caller {
            parts.push(escape_control(caller));
        }
        parts.push(entry.message.clone());
        if !entry.fields.is_empty() {
            parts.push(entry.fields.format_fields());
        }

        let mut line = parts.join(" ");
        if let Some(ref stack) = entry.stacktrace {
            line.push_str(" stacktrace=");
            line.push_str(&escape_control(stack));
        }
        line
    }

    fn encode_json(&self, entry: &LogEntry) -> Result<String> {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            "ts".to_string(),
            self.timestamp_format.format_json(&entry.timestamp),
        );
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(entry.level.as_config_str().to_string()),
        );
        if let Some(ref name) = entry.logger {
            json_obj.insert("logger".to_string(), serde_json::Value::String(name.clone()));
        }
        if let Some(ref caller) = entry.caller {
            json_obj.insert("caller".to_string(), serde_json::Value::String(caller.clone()));
        }
        json_obj.insert(
            "msg".to_string(),
            serde_json::Value::String(entry.message.clone()),
        );

        for (key, value) in entry.fields.iter() {
            json_obj.insert(key.to_string(), value.to_json_value());
        }

        if let Some(ref stack) = entry.stacktrace {
            json_obj.insert(
                "stacktrace".to_string(),
                serde_json::Value::String(stack.clone()),
            );
        }

        serde_json::to_string(&serde_json::Value::Object(json_obj))
            .map_err(|e| LoggerError::encode(self.format.as_str(), e.to_string()))
    }

    fn encode_key_value(&self, entry: &LogEntry) -> String {
        let mut parts = Vec::new();

        parts.push(format!(
            "ts={}",
            escape_value(&self.timestamp_format.format(&entry.timestamp))
        ));
        parts.push(format!("level={}", entry.level.as_config_str()));
        if let Some(ref name) = entry.logger {
            parts.push(format!("logger={}", escape_value(name)));
        }
        if let Some(ref caller) = entry.caller {
            parts.push(format!("caller={}", escape_value(caller)));
        }

        // Message is always quoted
        parts.push(format!("msg={}", quote_value(&entry.message)));

        for (key, value) in entry.fields.iter() {
            let formatted = match value {
                FieldValue::String(s) => escape_value(s),
                other => other.to_string(),
            };
            parts.push(format!("{}={}", escape_key(key), formatted));
        }

        if let Some(ref stack) = entry.stacktrace {
            parts.push(format!("stacktrace={}", quote_value(stack)));
        }

        parts.join(" ")
    }
}

/// Escape a logfmt key (remove spaces and special chars)
fn escape_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || *c == '.')
        .collect()
}

/// Escape a logfmt value (quote if contains spaces or control chars)
fn escape_value(value: &str) -> String {
    if value.is_empty() || value.contains([' ', '"', '=', '\n', '\r', '\t']) {
        quote_value(value)
    } else {
        value.to_string()
    }
}

fn quote_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escape_control(&escaped))
}
