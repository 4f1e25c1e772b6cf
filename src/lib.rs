//! # Dynamic Logger
//!
//! A structured logging core that can be reconfigured while the process is
//! running.
//!
//! ## Features
//!
//! - **Atomic reconfiguration**: a new logger is validated and built before
//!   it replaces the active one; a bad configuration never turns logging off
//! - **Multiple outputs**: stdout, stderr and size-rotated files with backup
//!   retention and gzip compression
//! - **Context fields**: trace and request identifiers plus configured keys
//!   are pulled from a request [`Context`]
//! - **Change notification**: callbacks run after every applied
//!   reconfiguration
//!
//! ## Example
//!
//! ```
//! use dynamic_logger::prelude::*;
//!
//! let logger = Logger::builder()
//!     .level(LogLevel::Info)
//!     .format(OutputFormat::Json)
//!     .output_paths(["stdout"])
//!     .build()
//!     .unwrap();
//!
//! let ctx = with_trace_id(&Context::background(), "4bf92f35");
//! logger.infow_ctx(&ctx, "request handled", Fields::new().with("status", 200));
//! logger.sync().unwrap();
//! ```

pub mod core;
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        request_id, trace_id, with_request_id, with_trace_id, Config, Context, ContextKey,
        FieldValue, Fields, LogLevel, Logger, LoggerBuilder, LoggerError, OutputFormat, Result,
        RotationConfig,
    };
    pub use crate::global::{CallbackId, SectionWatcher};
}

pub use crate::core::{
    extract_fields, request_id, trace_id, with_request_id, with_trace_id, BoxError, Config,
    Context, ContextKey, Encoder, FieldValue, Fields, LogEntry, LogLevel, Logger, LoggerBuilder,
    LoggerError, LoggerMetrics, OutputFormat, ReconfigureMetrics, ReconfigureStage, Result,
    RotationConfig, Sink, TimestampFormat, ValidatedConfig, REQUEST_ID_KEY, TRACE_ID_KEY,
};
pub use global::{
    init, new_logger, reconfigure_from_value, reconfigure_global_logger, register_callback,
    std_logger, sync, unregister_callback, watch_config, CallbackId, Coordinator, SectionHandler,
    SectionWatcher,
};
pub use global::emit::*;
pub use sinks::{FanoutSink, RotatingFileSink, RotationPolicy, StdStreamSink};
