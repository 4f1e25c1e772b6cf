//! Binding to an external configuration watcher

use crate::core::error::BoxError;

/// Handler invoked with the raw key/value tree of a changed section
pub type SectionHandler =
    Box<dyn Fn(&serde_json::Value) -> Result<(), BoxError> + Send + Sync + 'static>;

/// A configuration source that reports changes per named section
///
/// Implementations must not run the same handler concurrently with itself;
/// no ordering is assumed between different handlers.
pub trait SectionWatcher {
    fn register_section_change_callback(
        &self,
        section: &str,
        handler: SectionHandler,
    ) -> Result<(), BoxError>;
}
