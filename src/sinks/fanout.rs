//! Fan-out over several sinks

use crate::core::{LoggerError, Result, Sink};
use std::sync::Arc;

/// Writes every record to each inner sink in order
///
/// A failing sink does not stop the record from reaching the remaining
/// sinks; failures are collected and reported together.
#[derive(Clone)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn Sink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    fn collect_failures<F>(&self, mut op: F) -> Vec<String>
    where
        F: FnMut(&dyn Sink) -> Result<()>,
    {
        self.sinks
            .iter()
            .filter_map(|sink| {
                op(sink.as_ref())
                    .err()
                    .map(|e| format!("{}: {}", sink.name(), e))
            })
            .collect()
    }
}

impl Sink for FanoutSink {
    fn write(&self, record: &[u8]) -> Result<()> {
        let failures = self.collect_failures(|sink| sink.write(record));
        if failures.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::writer(failures.join("; ")))
        }
    }

    fn sync(&self) -> Result<()> {
        let failures = self.collect_failures(|sink| sink.sync());
        if failures.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::sync_failed(failures))
        }
    }

    fn name(&self) -> &str {
        "fanout"
    }

    fn wait_for_maintenance(&self) {
        for sink in &self.sinks {
            sink.wait_for_maintenance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct MemorySink {
        name: String,
        records: Mutex<Vec<String>>,
        fail: bool,
    }

    impl MemorySink {
        fn new(name: &str, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                records: Mutex::new(Vec::new()),
                fail,
            })
        }
    }

    impl Sink for MemorySink {
        fn write(&self, record: &[u8]) -> Result<()> {
            if self.fail {
                return Err(LoggerError::writer("simulated write failure"));
            }
            self.records
                .lock()
                .push(String::from_utf8_lossy(record).into_owned());
            Ok(())
        }

        fn sync(&self) -> Result<()> {
            if self.fail {
                return Err(LoggerError::writer("simulated flush failure"));
            }
            Ok(())
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    #[test]
    fn test_writes_reach_every_sink() {
        let a = MemorySink::new("a", false);
        let b = MemorySink::new("b", false);
        let fanout = FanoutSink::new(vec![a.clone(), b.clone()]);

        fanout.write(b"hello\n").unwrap();

        assert_eq!(a.records.lock().as_slice(), ["hello\n"]);
        assert_eq!(b.records.lock().as_slice(), ["hello\n"]);
        assert_eq!(fanout.sink_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_failing_sink_does_not_block_others() {
        let broken = MemorySink::new("broken", true);
        let healthy = MemorySink::new("healthy", false);
        let fanout = FanoutSink::new(vec![broken, healthy.clone()]);

        assert!(fanout.write(b"record\n").is_err());
        assert_eq!(healthy.records.lock().len(), 1);
    }

    #[test]
    fn test_sync_aggregates_failures() {
        let fanout = FanoutSink::new(vec![
            MemorySink::new("one", true),
            MemorySink::new("two", false),
            MemorySink::new("three", true),
        ]);

        match fanout.sync() {
            Err(LoggerError::SyncFailed { failures }) => {
                assert_eq!(failures.len(), 2);
                assert!(failures[0].starts_with("one:"));
                assert!(failures[1].starts_with("three:"));
            }
            other => panic!("expected SyncFailed, got {:?}", other.err()),
        }
    }
}
