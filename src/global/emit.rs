//! Emission through the process-wide logger
//!
//! Every call loads the active logger once and uses it for the whole record,
//! so a concurrent reconfiguration never splits one record across two
//! loggers.

use super::std_logger;
use crate::core::{Context, Fields, LogLevel};
use std::fmt;

macro_rules! global_level_functions {
    ($level:expr, $plain:ident, $printf:ident, $kv:ident, $plain_ctx:ident, $printf_ctx:ident, $kv_ctx:ident) => {
        #[track_caller]
        pub fn $plain(message: impl AsRef<str>) {
            std_logger().log($level, message)
        }

        #[track_caller]
        pub fn $printf(args: fmt::Arguments<'_>) {
            std_logger().logf($level, args)
        }

        #[track_caller]
        pub fn $kv(message: impl AsRef<str>, fields: Fields) {
            std_logger().logw($level, message, fields)
        }

        #[track_caller]
        pub fn $plain_ctx(ctx: &Context, message: impl AsRef<str>) {
            std_logger().log_ctx(ctx, $level, message)
        }

        #[track_caller]
        pub fn $printf_ctx(ctx: &Context, args: fmt::Arguments<'_>) {
            std_logger().logf_ctx(ctx, $level, args)
        }

        #[track_caller]
        pub fn $kv_ctx(ctx: &Context, message: impl AsRef<str>, fields: Fields) {
            std_logger().logw_ctx(ctx, $level, message, fields)
        }
    };
}

global_level_functions!(LogLevel::Debug, debug, debugf, debugw, debug_ctx, debugf_ctx, debugw_ctx);
global_level_functions!(LogLevel::Info, info, infof, infow, info_ctx, infof_ctx, infow_ctx);
global_level_functions!(LogLevel::Warn, warn, warnf, warnw, warn_ctx, warnf_ctx, warnw_ctx);
global_level_functions!(LogLevel::Error, error, errorf, errorw, error_ctx, errorf_ctx, errorw_ctx);
global_level_functions!(LogLevel::Fatal, fatal, fatalf, fatalw, fatal_ctx, fatalf_ctx, fatalw_ctx);
