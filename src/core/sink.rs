//! Sink trait for log output destinations

use super::error::Result;

/// Destination for encoded log bytes
///
/// Sinks are shared between a logger and every logger derived from it, and
/// between threads, so both operations take `&self` and serialize internally.
pub trait Sink: Send + Sync {
    /// Write one encoded record
    fn write(&self, record: &[u8]) -> Result<()>;

    /// Flush buffered bytes to the durable target
    fn sync(&self) -> Result<()>;

    fn name(&self) -> &str;

    /// Block until background work queued so far (compression, backup
    /// eviction) has finished
    fn wait_for_maintenance(&self) {}
}
