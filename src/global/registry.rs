//! Process-wide logger slot

use crate::core::{Logger, LoggerError, Result};
use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use std::sync::Arc;

/// Atomically swappable slot holding the active [`Logger`]
///
/// Reads never block and never observe a half-replaced logger: the slot
/// holds one `Arc<Logger>` and is replaced as a whole. The slot starts empty
/// and, once filled, is never emptied again.
pub struct LoggerRegistry {
    slot: ArcSwapOption<Logger>,
    init_lock: Mutex<()>,
}

impl LoggerRegistry {
    pub const fn new() -> Self {
        Self {
            slot: ArcSwapOption::const_empty(),
            init_lock: parking_lot::const_mutex(()),
        }
    }

    /// Current logger, if one has been stored
    pub fn load(&self) -> Option<Arc<Logger>> {
        self.slot.load_full()
    }

    pub fn is_initialized(&self) -> bool {
        self.slot.load().is_some()
    }

    /// Current logger, building the default with `init` on first access
    ///
    /// Concurrent first readers serialize on the init lock; only the first
    /// one runs `init`, the rest observe its result.
    pub fn get_or_init<F>(&self, init: F) -> Arc<Logger>
    where
        F: FnOnce() -> Logger,
    {
        if let Some(logger) = self.slot.load_full() {
            return logger;
        }

        let _guard = self.init_lock.lock();
        if let Some(logger) = self.slot.load_full() {
            return logger;
        }
        let logger = Arc::new(init());
        self.slot.store(Some(Arc::clone(&logger)));
        logger
    }

    /// Replace the active logger
    ///
    /// The logger is not validated here. Storing `None` is rejected and
    /// leaves the current logger in place.
    pub fn store(&self, logger: Option<Arc<Logger>>) -> Result<()> {
        match logger {
            Some(logger) => {
                self.slot.store(Some(logger));
                Ok(())
            }
            None => Err(LoggerError::EmptyLogger),
        }
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
