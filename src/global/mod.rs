//! Process-wide logger
//!
//! One [`Coordinator`] backs the package-level API. Until [`init`] or a
//! reconfiguration installs a logger, [`std_logger`] lazily installs the
//! stderr-only default.
//!
//! # Example
//!
//! ```no_run
//! use dynamic_logger::{global, Config, Fields};
//!
//! global::init(&Config::default()).unwrap();
//! global::infow("service started", Fields::new().with("port", 8080));
//!
//! let id = global::register_callback(|config| {
//!     println!("log level is now {}", config.level);
//!     Ok(())
//! });
//!
//! global::reconfigure_global_logger(Config {
//!     level: "debug".into(),
//!     ..Config::default()
//! })
//! .unwrap();
//!
//! global::unregister_callback(id);
//! global::sync().unwrap();
//! ```

pub mod callbacks;
pub mod coordinator;
pub mod emit;
pub mod registry;
pub mod watcher;

pub use callbacks::{Callback, CallbackId, CallbackRegistry};
pub use coordinator::Coordinator;
pub use emit::*;
pub use registry::LoggerRegistry;
pub use watcher::{SectionHandler, SectionWatcher};

use crate::core::error::BoxError;
use crate::core::{Config, Logger, Result};
use std::sync::Arc;

static GLOBAL: Coordinator = Coordinator::new();

/// Coordinator behind the package-level functions
pub fn coordinator() -> &'static Coordinator {
    &GLOBAL
}

/// Build a logger from `config` and install it as the process-wide logger
///
/// # Errors
///
/// Invalid configuration or unresolvable outputs; nothing is installed.
pub fn init(config: &Config) -> Result<()> {
    GLOBAL.init(config)
}

/// Build a standalone logger without touching the process-wide one
pub fn new_logger(config: &Config) -> Result<Logger> {
    Logger::new(config)
}

/// The active process-wide logger
pub fn std_logger() -> Arc<Logger> {
    GLOBAL.current()
}

/// Replace the process-wide logger and notify callbacks
///
/// # Errors
///
/// A rejected configuration leaves the active logger in place.
pub fn reconfigure_global_logger(config: Config) -> Result<()> {
    GLOBAL.reconfigure(config)
}

/// Reconfigure from a raw section tree
pub fn reconfigure_from_value(raw: &serde_json::Value) -> Result<()> {
    GLOBAL.apply_raw(raw)
}

pub fn register_callback<F>(callback: F) -> CallbackId
where
    F: Fn(&Config) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
{
    GLOBAL.register_callback(callback)
}

pub fn unregister_callback(id: CallbackId) -> bool {
    GLOBAL.unregister_callback(id)
}

/// Reconfigure the process-wide logger whenever `section` changes
pub fn watch_config<W>(watcher: &W, section: &str) -> Result<()>
where
    W: SectionWatcher + ?Sized,
{
    GLOBAL.subscribe(watcher, section)
}

/// Flush the active process-wide logger
pub fn sync() -> Result<()> {
    GLOBAL.sync()
}
