//! Error types for the logger system

use std::fmt;

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Error type returned by reconfiguration callbacks
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Step of a reconfiguration that rejected the new configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconfigureStage {
    Validation,
    Construction,
}

impl fmt::Display for ReconfigureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconfigureStage::Validation => write!(f, "validation"),
            ReconfigureStage::Construction => write!(f, "construction"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Raw configuration payload could not be decoded
    #[error("Failed to decode logging configuration: {message}")]
    Decode {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Replacement logger could not be validated or built
    #[error("Logger reconfiguration failed during {stage}: {source}")]
    Reconfiguration {
        stage: ReconfigureStage,
        #[source]
        source: Box<LoggerError>,
    },

    /// Output specifier that cannot be resolved to a sink
    #[error("Unsupported output '{spec}': {message}")]
    UnsupportedOutput { spec: String, message: String },

    /// Directory creation or stat failure while preparing a file sink
    #[error("Cannot prepare log file '{path}': {message}")]
    RotationSetup {
        path: String,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },

    /// One or more sinks failed to flush
    #[error("Sync failed for {} sink(s): {}", failures.len(), failures.join("; "))]
    SyncFailed { failures: Vec<String> },

    /// Record could not be encoded
    #[error("Encoder error ({format}): {message}")]
    Encode { format: String, message: String },

    /// Registry store of an empty logger
    #[error("Refusing to install an empty logger")]
    EmptyLogger,

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a decode error for a raw configuration payload
    pub fn decode(message: impl Into<String>, source: serde_json::Error) -> Self {
        LoggerError::Decode {
            message: message.into(),
            source,
        }
    }

    /// Wrap an error raised while building a replacement logger
    pub fn reconfiguration(stage: ReconfigureStage, source: LoggerError) -> Self {
        LoggerError::Reconfiguration {
            stage,
            source: Box::new(source),
        }
    }

    /// Create an unsupported output error
    pub fn unsupported_output(spec: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::UnsupportedOutput {
            spec: spec.into(),
            message: message.into(),
        }
    }

    /// Create a rotation setup error
    pub fn rotation_setup(
        path: impl Into<String>,
        message: impl Into<String>,
        source: Option<std::io::Error>,
    ) -> Self {
        LoggerError::RotationSetup {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an aggregated sync error
    pub fn sync_failed(failures: Vec<String>) -> Self {
        LoggerError::SyncFailed { failures }
    }

    /// Create an encoder error
    pub fn encode(format: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Encode {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Stage at which a reconfiguration was rejected, if this is one
    #[must_use]
    pub fn reconfigure_stage(&self) -> Option<ReconfigureStage> {
        match self {
            LoggerError::Reconfiguration { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
