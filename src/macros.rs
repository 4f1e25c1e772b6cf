//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. Arguments are
//! only formatted when the level is enabled.
//!
//! # Examples
//!
//! ```
//! use dynamic_logger::prelude::*;
//! use dynamic_logger::info;
//!
//! let logger = Logger::stderr_fallback();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With a request context
//! let ctx = with_request_id(&Context::background(), "req-7");
//! info!(logger, ctx: &ctx; "User {} logged in", 42);
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use dynamic_logger::prelude::*;
/// # let logger = Logger::stderr_fallback();
/// use dynamic_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, ctx: $ctx:expr; $($arg:tt)+) => {
        $logger.logf_ctx($ctx, $level, format_args!($($arg)+))
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.logf($level, format_args!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use dynamic_logger::prelude::*;
/// # let logger = Logger::builder().level(LogLevel::Debug).build().unwrap();
/// use dynamic_logger::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, ctx: $ctx:expr; $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, ctx: $ctx; $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use dynamic_logger::prelude::*;
/// # let logger = Logger::stderr_fallback();
/// use dynamic_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, ctx: $ctx:expr; $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, ctx: $ctx; $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, ctx: $ctx:expr; $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, ctx: $ctx; $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, ctx: $ctx:expr; $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, ctx: $ctx; $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message. The logger is flushed afterwards; the process
/// keeps running.
///
/// # Examples
///
/// ```
/// # use dynamic_logger::prelude::*;
/// # let logger = Logger::builder().disable_stacktrace(true).build().unwrap();
/// use dynamic_logger::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, ctx: $ctx:expr; $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, ctx: $ctx; $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
