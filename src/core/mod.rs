//! Core logger types and traits

pub mod config;
pub mod context;
pub mod encoder;
pub mod error;
pub mod extractor;
pub mod fields;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod sink;
pub mod timestamp;

pub use config::{Config, RotationConfig, ValidatedConfig};
pub use context::{
    request_id, trace_id, with_request_id, with_trace_id, Context, ContextKey, REQUEST_ID_KEY,
    TRACE_ID_KEY,
};
pub use encoder::{Encoder, OutputFormat};
pub use error::{BoxError, LoggerError, ReconfigureStage, Result};
pub use extractor::extract_fields;
pub use fields::{FieldValue, Fields};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::{LoggerMetrics, ReconfigureMetrics};
pub use sink::Sink;
pub use timestamp::TimestampFormat;
