//! Logger metrics for observability
//!
//! Counters for monitoring logger health: records written, records lost to
//! encode/write failures, and reconfiguration outcomes.

use std::sync::atomic::{AtomicU64, Ordering};

/// Write-path counters, shared by a logger and every logger derived from it
///
/// # Example
///
/// ```
/// use dynamic_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_written();
/// metrics.record_dropped();
///
/// assert_eq!(metrics.written_count(), 1);
/// assert_eq!(metrics.dropped_count(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records written to every primary sink
    written_count: AtomicU64,

    /// Records that failed to encode or write to at least one sink
    dropped_count: AtomicU64,

    /// Internal failures that could not be reported to the error sink either
    unreported_errors: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            written_count: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
            unreported_errors: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn written_count(&self) -> u64 {
        self.written_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn unreported_errors(&self) -> u64 {
        self.unreported_errors.load(Ordering::Relaxed)
    }

    /// Record a written entry, returning the previous count
    #[inline]
    pub fn record_written(&self) -> u64 {
        self.written_count.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a dropped entry, returning the previous count
    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_unreported(&self) -> u64 {
        self.unreported_errors.fetch_add(1, Ordering::Relaxed)
    }

    /// Get drop rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if no logs have been processed.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.written_count() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Reconfiguration counters kept by a coordinator
#[derive(Debug, Default)]
pub struct ReconfigureMetrics {
    applied: AtomicU64,
    rejected: AtomicU64,
    callback_failures: AtomicU64,
}

impl ReconfigureMetrics {
    pub const fn new() -> Self {
        Self {
            applied: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            callback_failures: AtomicU64::new(0),
        }
    }

    /// Reconfigurations that installed a new logger
    #[inline]
    pub fn applied(&self) -> u64 {
        self.applied.load(Ordering::Relaxed)
    }

    /// Reconfigurations aborted at decode, validation or construction
    #[inline]
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn callback_failures(&self) -> u64 {
        self.callback_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_applied(&self) -> u64 {
        self.applied.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected(&self) -> u64 {
        self.rejected.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_callback_failure(&self) -> u64 {
        self.callback_failures.fetch_add(1, Ordering::Relaxed)
    }
}
