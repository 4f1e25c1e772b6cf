//! Logger configuration
//!
//! [`Config`] is a plain serializable value. It decodes directly from the raw
//! key/value tree handed over by a configuration watcher, and is checked by
//! [`Config::validate`] before any logger is built from it.

use super::context::ContextKey;
use super::encoder::OutputFormat;
use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

pub const STDOUT: &str = "stdout";
pub const STDERR: &str = "stderr";

/// Rotation parameters applied to every file output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RotationConfig {
    /// Size in megabytes at which the active file is rotated
    #[serde(alias = "maxSize", alias = "maxSizeMB", alias = "max_size_mb", alias = "max_size")]
    pub max_size_mb: u64,
    /// Backups to keep; 0 keeps all
    #[serde(alias = "max_backups")]
    pub max_backups: u32,
    /// Age in days after which backups are deleted; 0 disables age eviction
    #[serde(alias = "maxAge", alias = "max_age_days", alias = "max_age")]
    pub max_age_days: u32,
    pub compress: bool,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            max_size_mb: 100,
            max_backups: 0,
            max_age_days: 0,
            compress: false,
        }
    }
}

/// Complete logging configuration
///
/// # Example
///
/// ```
/// use dynamic_logger::Config;
///
/// let config = Config::from_json_str(r#"{
///     "level": "debug",
///     "format": "json",
///     "outputPaths": ["stdout"],
///     "rotation": { "maxSize": 50, "maxBackups": 3 }
/// }"#).unwrap();
///
/// assert_eq!(config.level, "debug");
/// assert_eq!(config.rotation.max_size_mb, 50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub level: String,
    pub format: String,
    #[serde(alias = "output_paths", alias = "outputs")]
    pub output_paths: Vec<String>,
    #[serde(alias = "error_output_paths", alias = "errorOutputs")]
    pub error_output_paths: Vec<String>,
    #[serde(alias = "disable_caller")]
    pub disable_caller: bool,
    #[serde(alias = "disable_stacktrace")]
    pub disable_stacktrace: bool,
    #[serde(alias = "stacktrace_level")]
    pub stacktrace_level: String,
    #[serde(alias = "enable_color")]
    pub enable_color: bool,
    pub development: bool,
    pub name: String,
    #[serde(alias = "time_format")]
    pub time_format: String,
    pub rotation: RotationConfig,
    /// Context keys extracted by context-aware emission calls, in order.
    /// Key tokens cannot be serialized; see [`ContextKey`].
    #[serde(skip)]
    pub context_keys: Vec<ContextKey>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            output_paths: vec![STDERR.to_string()],
            error_output_paths: vec![STDERR.to_string()],
            disable_caller: false,
            disable_stacktrace: false,
            stacktrace_level: "error".to_string(),
            enable_color: false,
            development: false,
            name: String::new(),
            time_format: String::new(),
            rotation: RotationConfig::default(),
            context_keys: Vec::new(),
        }
    }
}

/// Typed settings produced by a successful [`Config::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    pub level: LogLevel,
    /// Threshold for stack capture, already adjusted for development mode
    pub stacktrace_level: LogLevel,
    pub format: OutputFormat,
    pub timestamp_format: TimestampFormat,
}

impl Config {
    /// Decode a raw key/value tree; absent keys keep their defaults
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| LoggerError::decode("logging section", e))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LoggerError::decode("logging section", e))
    }

    /// Whether a specifier names a file rather than a standard stream
    pub fn is_file_output(spec: &str) -> bool {
        !matches!(spec.trim(), STDOUT | STDERR)
    }

    fn has_file_outputs(&self) -> bool {
        self.output_paths
            .iter()
            .chain(self.error_output_paths.iter())
            .any(|spec| Self::is_file_output(spec))
    }

    /// Check every invariant and resolve the typed settings
    pub fn validate(&self) -> Result<ValidatedConfig> {
        let level: LogLevel = self
            .level
            .parse()
            .map_err(|e: String| LoggerError::config("level", e))?;

        let mut stacktrace_level: LogLevel = self
            .stacktrace_level
            .parse()
            .map_err(|e: String| LoggerError::config("stacktraceLevel", e))?;
        if self.development {
            stacktrace_level = stacktrace_level.min(LogLevel::Warn);
        }

        let format: OutputFormat = self
            .format
            .parse()
            .map_err(|e: String| LoggerError::config("format", e))?;

        let timestamp_format: TimestampFormat = self
            .time_format
            .parse()
            .map_err(|e: String| LoggerError::config("timeFormat", e))?;

        if self.output_paths.is_empty() {
            return Err(LoggerError::config(
                "outputPaths",
                "at least one output is required",
            ));
        }

        if self.has_file_outputs() && self.rotation.max_size_mb == 0 {
            return Err(LoggerError::config(
                "rotation.maxSize",
                "must be greater than zero when writing to files",
            ));
        }

        Ok(ValidatedConfig {
            level,
            stacktrace_level,
            format,
            timestamp_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_config_is_valid() {
        let validated = Config::default().validate().unwrap();
        assert_eq!(validated.level, LogLevel::Info);
        assert_eq!(validated.stacktrace_level, LogLevel::Error);
        assert_eq!(validated.format, OutputFormat::Text);
        assert_eq!(validated.timestamp_format, TimestampFormat::Iso8601);
    }

    #[test]
    fn test_decode_partial_tree_keeps_defaults() {
        let config = Config::from_value(&json!({ "level": "warn" })).unwrap();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, "text");
        assert_eq!(config.output_paths, vec!["stderr".to_string()]);
    }

    #[test]
    fn test_decode_accepts_snake_case_aliases() {
        let config = Config::from_value(&json!({
            "output_paths": ["stdout", "/tmp/app.log"],
            "disable_caller": true,
            "rotation": { "max_size_mb": 5, "max_backups": 2, "max_age_days": 7, "compress": true }
        }))
        .unwrap();

        assert_eq!(config.output_paths.len(), 2);
        assert!(config.disable_caller);
        assert_eq!(
            config.rotation,
            RotationConfig {
                max_size_mb: 5,
                max_backups: 2,
                max_age_days: 7,
                compress: true
            }
        );
    }

    #[test]
    fn test_decode_rejects_wrong_types() {
        let err = Config::from_value(&json!({ "outputPaths": "stdout" })).unwrap_err();
        assert!(matches!(err, LoggerError::Decode { .. }));

        let err = Config::from_value(&json!({ "rotation": { "maxSize": -1 } })).unwrap_err();
        assert!(matches!(err, LoggerError::Decode { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_level = Config {
            level: "loud".into(),
            ..Config::default()
        };
        assert!(matches!(
            bad_level.validate(),
            Err(LoggerError::InvalidConfiguration { .. })
        ));

        let bad_format = Config {
            format: "xml".into(),
            ..Config::default()
        };
        assert!(bad_format.validate().is_err());

        let bad_stack = Config {
            stacktrace_level: "never".into(),
            ..Config::default()
        };
        assert!(bad_stack.validate().is_err());

        let no_outputs = Config {
            output_paths: vec![],
            ..Config::default()
        };
        assert!(no_outputs.validate().is_err());
    }

    #[test]
    fn test_rotation_size_required_only_for_files() {
        let mut config = Config {
            rotation: RotationConfig {
                max_size_mb: 0,
                ..RotationConfig::default()
            },
            ..Config::default()
        };
        assert!(config.validate().is_ok());

        config.output_paths.push("/var/log/app.log".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_development_lowers_stacktrace_level() {
        let config = Config {
            development: true,
            ..Config::default()
        };
        assert_eq!(config.validate().unwrap().stacktrace_level, LogLevel::Warn);

        let config = Config {
            development: true,
            stacktrace_level: "debug".into(),
            ..Config::default()
        };
        assert_eq!(config.validate().unwrap().stacktrace_level, LogLevel::Debug);
    }

    #[test]
    fn test_context_keys_are_not_serialized() {
        let config = Config {
            context_keys: vec![ContextKey::new("tenant")],
            ..Config::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("contextKeys").is_none());
        assert_eq!(json["outputPaths"], json!(["stderr"]));
    }
}
