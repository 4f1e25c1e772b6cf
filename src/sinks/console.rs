//! Standard stream sinks

use crate::core::{LoggerError, Result, Sink};
use std::io::Write;

/// Which process stream a [`StdStreamSink`] writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdStream {
    Stdout,
    Stderr,
}

/// Sink over the already-open stdout or stderr handle
///
/// Each record is written while holding the stream lock, so records from
/// concurrent writers never interleave.
#[derive(Debug)]
pub struct StdStreamSink {
    stream: StdStream,
}

impl StdStreamSink {
    pub fn stdout() -> Self {
        Self {
            stream: StdStream::Stdout,
        }
    }

    pub fn stderr() -> Self {
        Self {
            stream: StdStream::Stderr,
        }
    }

    pub fn stream(&self) -> StdStream {
        self.stream
    }
}

impl Sink for StdStreamSink {
    fn write(&self, record: &[u8]) -> Result<()> {
        let result = match self.stream {
            StdStream::Stdout => std::io::stdout().lock().write_all(record),
            StdStream::Stderr => std::io::stderr().lock().write_all(record),
        };
        result.map_err(|e| LoggerError::io_operation("writing log record", self.name(), e))
    }

    fn sync(&self) -> Result<()> {
        let result = match self.stream {
            StdStream::Stdout => std::io::stdout().lock().flush(),
            StdStream::Stderr => std::io::stderr().lock().flush(),
        };
        result.map_err(|e| LoggerError::io_operation("flushing log stream", self.name(), e))
    }

    fn name(&self) -> &str {
        match self.stream {
            StdStream::Stdout => "stdout",
            StdStream::Stderr => "stderr",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_names() {
        assert_eq!(StdStreamSink::stdout().name(), "stdout");
        assert_eq!(StdStreamSink::stderr().name(), "stderr");
        assert_eq!(StdStreamSink::stderr().stream(), StdStream::Stderr);
    }

    #[test]
    fn test_write_and_sync() {
        let sink = StdStreamSink::stdout();
        sink.write(b"console sink test record\n").unwrap();
        sink.sync().unwrap();
    }
}
