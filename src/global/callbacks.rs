//! Reconfiguration callbacks

use crate::core::error::BoxError;
use crate::core::Config;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Invoked with the new configuration after a reconfiguration is applied
pub type Callback = Arc<dyn Fn(&Config) -> Result<(), BoxError> + Send + Sync>;

/// Handle returned by [`CallbackRegistry::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "callback-{}", self.0)
    }
}

/// Registered callbacks, kept in registration order
pub struct CallbackRegistry {
    next_id: AtomicU64,
    entries: RwLock<Vec<(CallbackId, Callback)>>,
}

impl CallbackRegistry {
    pub const fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: parking_lot::const_rwlock(Vec::new()),
        }
    }

    pub fn register<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&Config) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let id = CallbackId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.write().push((id, Arc::new(callback)));
        id
    }

    /// Remove a callback; returns whether it was registered
    pub fn unregister(&self, id: CallbackId) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Copy of the current entries; the lock is released before returning
    pub fn snapshot(&self) -> Vec<(CallbackId, Callback)> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}
