//! Logger instance
//!
//! A [`Logger`] is an immutable, fully configured handle: threshold, encoder
//! and sinks are fixed when it is built. Cloning is cheap, and
//! [`Logger::with_name`] / [`Logger::with_values`] derive new handles that
//! share the same sinks and metrics.

use super::config::{Config, ValidatedConfig};
use super::context::{Context, ContextKey};
use super::encoder::{Encoder, OutputFormat};
use super::error::{LoggerError, Result};
use super::extractor::extract_fields;
use super::fields::Fields;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::metrics::LoggerMetrics;
use super::sink::Sink;
use super::timestamp::TimestampFormat;
use crate::sinks::{FanoutSink, SinkResolver, StdStreamSink};
use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// State shared by a logger and every handle derived from it
struct LoggerCore {
    level: LogLevel,
    stacktrace_level: LogLevel,
    disable_caller: bool,
    disable_stacktrace: bool,
    encoder: Encoder,
    sink: FanoutSink,
    error_sink: FanoutSink,
    config: Config,
    metrics: LoggerMetrics,
}

#[derive(Clone)]
pub struct Logger {
    core: Arc<LoggerCore>,
    name: Option<Arc<str>>,
    fields: Arc<Fields>,
}

macro_rules! level_methods {
    ($level:expr, $plain:ident, $printf:ident, $kv:ident, $plain_ctx:ident, $printf_ctx:ident, $kv_ctx:ident) => {
        #[track_caller]
        pub fn $plain(&self, message: impl AsRef<str>) {
            self.log($level, message)
        }

        #[track_caller]
        pub fn $printf(&self, args: fmt::Arguments<'_>) {
            self.logf($level, args)
        }

        #[track_caller]
        pub fn $kv(&self, message: impl AsRef<str>, fields: Fields) {
            self.logw($level, message, fields)
        }

        #[track_caller]
        pub fn $plain_ctx(&self, ctx: &Context, message: impl AsRef<str>) {
            self.log_ctx(ctx, $level, message)
        }

        #[track_caller]
        pub fn $printf_ctx(&self, ctx: &Context, args: fmt::Arguments<'_>) {
            self.logf_ctx(ctx, $level, args)
        }

        #[track_caller]
        pub fn $kv_ctx(&self, ctx: &Context, message: impl AsRef<str>, fields: Fields) {
            self.logw_ctx(ctx, $level, message, fields)
        }
    };
}

impl Logger {
    /// Build a logger from `config`
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration or an output that cannot be
    /// resolved; no partially built logger is returned.
    pub fn new(config: &Config) -> Result<Self> {
        let validated = config.validate()?;

        let mut resolver = SinkResolver::new(&config.rotation);
        let sink = resolver.resolve_all(&config.output_paths)?;
        let error_sink = resolver.resolve_all(&config.error_output_paths)?;

        Ok(Self::from_parts(config.clone(), validated, sink, error_sink))
    }

    /// Default stderr-only logger; cannot fail
    #[must_use]
    pub fn stderr_fallback() -> Self {
        let validated = ValidatedConfig {
            level: LogLevel::Info,
            stacktrace_level: LogLevel::Error,
            format: OutputFormat::Text,
            timestamp_format: TimestampFormat::Iso8601,
        };
        let stderr = || FanoutSink::new(vec![Arc::new(StdStreamSink::stderr()) as Arc<dyn Sink>]);

        Self::from_parts(Config::default(), validated, stderr(), stderr())
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    fn from_parts(
        config: Config,
        validated: ValidatedConfig,
        sink: FanoutSink,
        error_sink: FanoutSink,
    ) -> Self {
        let name = (!config.name.is_empty()).then(|| Arc::from(config.name.as_str()));
        let core = LoggerCore {
            level: validated.level,
            stacktrace_level: validated.stacktrace_level,
            disable_caller: config.disable_caller,
            disable_stacktrace: config.disable_stacktrace,
            encoder: Encoder::new(
                validated.format,
                validated.timestamp_format,
                config.enable_color,
            ),
            sink,
            error_sink,
            config,
            metrics: LoggerMetrics::new(),
        };

        Self {
            core: Arc::new(core),
            name,
            fields: Arc::new(Fields::new()),
        }
    }

    /// Effective severity threshold
    pub fn level(&self) -> LogLevel {
        self.core.level
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.core.level
    }

    /// Configuration this logger was built from
    pub fn config(&self) -> &Config {
        &self.core.config
    }

    pub fn context_keys(&self) -> &[ContextKey] {
        &self.core.config.context_keys
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Fields attached with [`Logger::with_values`]
    pub fn bound_fields(&self) -> &Fields {
        &self.fields
    }

    /// Counters shared by this logger and every handle derived from it
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.core.metrics
    }

    /// New handle that adds `fields` to every record
    #[must_use]
    pub fn with_values(&self, fields: Fields) -> Self {
        if fields.is_empty() {
            return self.clone();
        }
        let mut bound = (*self.fields).clone();
        bound.extend(&fields);

        Self {
            core: Arc::clone(&self.core),
            name: self.name.clone(),
            fields: Arc::new(bound),
        }
    }

    /// New handle whose name has `segment` appended (`parent.segment`)
    #[must_use]
    pub fn with_name(&self, segment: &str) -> Self {
        if segment.is_empty() {
            return self.clone();
        }
        let name = match self.name {
            Some(ref parent) => format!("{}.{}", parent, segment),
            None => segment.to_string(),
        };

        Self {
            core: Arc::clone(&self.core),
            name: Some(Arc::from(name)),
            fields: Arc::clone(&self.fields),
        }
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        if self.enabled(level) {
            self.emit(level, message.as_ref(), None, None, Location::caller());
        }
    }

    /// Log a pre-formatted message; formatting is skipped below the threshold
    #[track_caller]
    pub fn logf(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if self.enabled(level) {
            self.emit(level, &fmt::format(args), None, None, Location::caller());
        }
    }

    #[track_caller]
    pub fn logw(&self, level: LogLevel, message: impl AsRef<str>, fields: Fields) {
        if self.enabled(level) {
            self.emit(level, message.as_ref(), None, Some(fields), Location::caller());
        }
    }

    #[track_caller]
    pub fn log_ctx(&self, ctx: &Context, level: LogLevel, message: impl AsRef<str>) {
        if self.enabled(level) {
            self.emit(level, message.as_ref(), Some(ctx), None, Location::caller());
        }
    }

    #[track_caller]
    pub fn logf_ctx(&self, ctx: &Context, level: LogLevel, args: fmt::Arguments<'_>) {
        if self.enabled(level) {
            self.emit(level, &fmt::format(args), Some(ctx), None, Location::caller());
        }
    }

    #[track_caller]
    pub fn logw_ctx(&self, ctx: &Context, level: LogLevel, message: impl AsRef<str>, fields: Fields) {
        if self.enabled(level) {
            self.emit(
                level,
                message.as_ref(),
                Some(ctx),
                Some(fields),
                Location::caller(),
            );
        }
    }

    level_methods!(LogLevel::Debug, debug, debugf, debugw, debug_ctx, debugf_ctx, debugw_ctx);
    level_methods!(LogLevel::Info, info, infof, infow, info_ctx, infof_ctx, infow_ctx);
    level_methods!(LogLevel::Warn, warn, warnf, warnw, warn_ctx, warnf_ctx, warnw_ctx);
    level_methods!(LogLevel::Error, error, errorf, errorw, error_ctx, errorf_ctx, errorw_ctx);
    level_methods!(LogLevel::Fatal, fatal, fatalf, fatalw, fatal_ctx, fatalf_ctx, fatalw_ctx);

    /// Build, encode and write one record. Field order: bound fields,
    /// context fields, then call-site fields.
    fn emit(
        &self,
        level: LogLevel,
        message: &str,
        ctx: Option<&Context>,
        call_fields: Option<Fields>,
        location: &Location<'_>,
    ) {
        let core = &self.core;

        let mut fields = (*self.fields).clone();
        if let Some(ctx) = ctx {
            fields.extend(&extract_fields(ctx, &core.config.context_keys));
        }
        if let Some(ref call_fields) = call_fields {
            fields.extend(call_fields);
        }

        let mut entry = LogEntry::new(level, message)
            .with_logger(self.name())
            .with_fields(fields);
        if !core.disable_caller {
            entry = entry.with_caller(location);
        }
        if !core.disable_stacktrace && level >= core.stacktrace_level {
            entry = entry.with_stacktrace(Backtrace::force_capture().to_string());
        }

        let written = core
            .encoder
            .encode(&entry)
            .and_then(|record| core.sink.write(record.as_bytes()));
        match written {
            Ok(()) => {
                core.metrics.record_written();
            }
            Err(e) => {
                core.metrics.record_dropped();
                self.report_internal("write", &e);
            }
        }

        if level == LogLevel::Fatal {
            if let Err(e) = core.sink.sync() {
                self.report_internal("sync", &e);
            }
        }
    }

    /// Report a failure of the logger itself on the error sink, never on the
    /// primary outputs
    fn report_internal(&self, operation: &str, error: &LoggerError) {
        let mut line = format!(
            "{} internal logger error during {}: {}",
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            operation,
            error
        )
        .replace('\n', " ");
        line.push('\n');

        if let Err(e) = self.core.error_sink.write(line.as_bytes()) {
            self.core.metrics.record_unreported();
            eprintln!("[LOGGER ERROR] {} failed: {} (error output: {})", operation, error, e);
        }
    }

    /// Flush every primary and error sink to its durable target
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::SyncFailed`] listing every sink that failed;
    /// the remaining sinks are still flushed.
    pub fn sync(&self) -> Result<()> {
        let mut failures = Vec::new();
        for sink in [&self.core.sink, &self.core.error_sink] {
            match sink.sync() {
                Ok(()) => {}
                Err(LoggerError::SyncFailed { failures: inner }) => failures.extend(inner),
                Err(e) => failures.push(e.to_string()),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::sync_failed(failures))
        }
    }

    /// Block until queued backup compression and eviction have finished
    ///
    /// Dropping a logger never waits for this work.
    pub fn wait_for_maintenance(&self) {
        self.core.sink.wait_for_maintenance();
        self.core.error_sink.wait_for_maintenance();
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.core.level)
            .field("format", &self.core.encoder.format())
            .field("name", &self.name)
            .field("outputs", &self.core.sink.sink_names())
            .field("error_outputs", &self.core.error_sink.sink_names())
            .finish()
    }
}

/// Builder for constructing a [`Logger`] with a fluent API
///
/// # Example
/// ```
/// use dynamic_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .level(LogLevel::Debug)
///     .format(OutputFormat::Json)
///     .output_paths(["stdout"])
///     .name("api")
///     .build()
///     .unwrap();
///
/// assert_eq!(logger.level(), LogLevel::Debug);
/// assert_eq!(logger.name(), Some("api"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoggerBuilder {
    config: Config,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level.as_config_str().to_string();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format.as_str().to_string();
        self
    }

    /// Replace the output list
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn output_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.output_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the error output list
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn error_output_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.error_output_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn disable_caller(mut self, disabled: bool) -> Self {
        self.config.disable_caller = disabled;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn disable_stacktrace(mut self, disabled: bool) -> Self {
        self.config.disable_stacktrace = disabled;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn stacktrace_level(mut self, level: LogLevel) -> Self {
        self.config.stacktrace_level = level.as_config_str().to_string();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn enable_color(mut self, enabled: bool) -> Self {
        self.config.enable_color = enabled;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn development(mut self, enabled: bool) -> Self {
        self.config.development = enabled;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn time_format(mut self, format: impl Into<String>) -> Self {
        self.config.time_format = format.into();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn rotation(mut self, rotation: super::config::RotationConfig) -> Self {
        self.config.rotation = rotation;
        self
    }

    /// Append a context key to extract on context-aware calls
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn context_key(mut self, key: ContextKey) -> Self {
        self.config.context_keys.push(key);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    /// # Errors
    ///
    /// Same as [`Logger::new`].
    pub fn build(self) -> Result<Logger> {
        Logger::new(&self.config)
    }
}
