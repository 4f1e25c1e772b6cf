//! Reconfiguration coordinator
//!
//! Owns the logger slot, the callback list and the reconfiguration counters.
//! A replacement logger is fully built before it is stored, so a rejected
//! configuration never disturbs the logger that is already active.

use super::callbacks::{CallbackId, CallbackRegistry};
use super::registry::LoggerRegistry;
use super::watcher::SectionWatcher;
use crate::core::error::{BoxError, ReconfigureStage};
use crate::core::{Config, Fields, LogLevel, Logger, LoggerError, ReconfigureMetrics, Result};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

pub struct Coordinator {
    registry: LoggerRegistry,
    callbacks: CallbackRegistry,
    metrics: ReconfigureMetrics,
}

impl Coordinator {
    pub const fn new() -> Self {
        Self {
            registry: LoggerRegistry::new(),
            callbacks: CallbackRegistry::new(),
            metrics: ReconfigureMetrics::new(),
        }
    }

    pub fn registry(&self) -> &LoggerRegistry {
        &self.registry
    }

    pub fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }

    pub fn metrics(&self) -> &ReconfigureMetrics {
        &self.metrics
    }

    /// Active logger; the stderr default is installed on first access
    pub fn current(&self) -> Arc<Logger> {
        self.registry.get_or_init(Logger::stderr_fallback)
    }

    /// Build a logger from `config` and make it the active one
    ///
    /// Callbacks are not notified.
    pub fn init(&self, config: &Config) -> Result<()> {
        let logger = Logger::new(config)?;
        self.registry.store(Some(Arc::new(logger)))
    }

    pub fn register_callback<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&Config) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        self.callbacks.register(callback)
    }

    pub fn unregister_callback(&self, id: CallbackId) -> bool {
        self.callbacks.unregister(id)
    }

    /// Validate, build, store, then notify callbacks
    ///
    /// # Errors
    ///
    /// A [`LoggerError::Reconfiguration`] tagged with the stage that rejected
    /// `config`. The active logger is unchanged in that case.
    pub fn reconfigure(&self, config: Config) -> Result<()> {
        let built = config
            .validate()
            .map_err(|e| LoggerError::reconfiguration(ReconfigureStage::Validation, e))
            .and_then(|_| {
                Logger::new(&config)
                    .map_err(|e| LoggerError::reconfiguration(ReconfigureStage::Construction, e))
            });

        let logger = match built {
            Ok(logger) => Arc::new(logger),
            Err(e) => {
                self.reject(&e);
                return Err(e);
            }
        };

        self.registry.store(Some(Arc::clone(&logger)))?;
        self.metrics.record_applied();
        self.notify(&logger);
        Ok(())
    }

    /// Decode a raw section tree and reconfigure from it
    ///
    /// Context keys cannot travel in the raw tree, so the active logger's
    /// keys are carried over.
    pub fn apply_raw(&self, raw: &serde_json::Value) -> Result<()> {
        let mut config = match Config::from_value(raw) {
            Ok(config) => config,
            Err(e) => {
                self.reject(&e);
                return Err(e);
            }
        };

        if let Some(active) = self.registry.load() {
            config.context_keys = active.context_keys().to_vec();
        }
        self.reconfigure(config)
    }

    /// Reconfigure whenever `section` changes in `watcher`
    pub fn subscribe<W>(&'static self, watcher: &W, section: &str) -> Result<()>
    where
        W: SectionWatcher + ?Sized,
    {
        watcher
            .register_section_change_callback(
                section,
                Box::new(move |raw: &serde_json::Value| {
                    self.apply_raw(raw).map_err(BoxError::from)
                }),
            )
            .map_err(|e| LoggerError::other(format!("cannot watch section '{}': {}", section, e)))
    }

    pub fn sync(&self) -> Result<()> {
        self.current().sync()
    }

    fn reject(&self, error: &LoggerError) {
        self.metrics.record_rejected();

        let stage = match error {
            LoggerError::Decode { .. } => "decode".to_string(),
            other => other
                .reconfigure_stage()
                .map_or_else(|| "store".to_string(), |stage| stage.to_string()),
        };
        self.current().logw(
            LogLevel::Error,
            "logger reconfiguration rejected",
            Fields::new()
                .with("stage", stage)
                .with("error", error.to_string()),
        );
    }

    /// Run every callback against a snapshot; failures are logged on the
    /// new logger and never stop the remaining callbacks
    fn notify(&self, logger: &Logger) {
        for (id, callback) in self.callbacks.snapshot() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| callback(logger.config())));
            let error = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e.to_string(),
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    format!("callback panicked: {}", panic_msg)
                }
            };

            self.metrics.record_callback_failure();
            logger.logw(
                LogLevel::Warn,
                "reconfiguration callback failed",
                Fields::new()
                    .with("callback_id", id.to_string())
                    .with("error", error),
            );
        }
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}
