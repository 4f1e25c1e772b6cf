//! Sink implementations
//!
//! - [`StdStreamSink`]: process stdout / stderr
//! - [`RotatingFileSink`]: size-rotated file with backup retention
//! - [`FanoutSink`]: writes each record to several sinks

pub mod console;
pub mod fanout;
pub mod resolver;
pub mod rotating_file;

pub use console::{StdStream, StdStreamSink};
pub use fanout::FanoutSink;
pub use resolver::{ensure_parent_dir, resolve_outputs, OutputSpec, SinkResolver};
pub use rotating_file::{RotatingFileSink, RotationPolicy};
