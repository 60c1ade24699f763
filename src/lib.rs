//! Weather Events Library
//!
//! A Rust library for turning a stream of weather station events into
//! snapshot and reset summaries of per-station temperature extremes.
//!
//! This library provides tools for:
//! - Decoding sample and control records with strict field checks
//! - Tracking the highest and lowest temperature per station since the last reset
//! - Lazy, single-pass processing as an `Iterator` or an async `Stream`
//! - Reading newline-delimited JSON input and writing NDJSON output
//! - Run statistics and fail-fast error reporting

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod event_processor;
        pub mod event_stream;
        pub mod ndjson;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{ControlCommand, Event, Numeric, OutputRecord, Sample, StationStats};
pub use app::services::event_processor::{
    EventProcessor, EventRecord, ProcessEvents, RunStats, process_events,
};
pub use app::services::event_stream::{EventStream, process_stream};
pub use config::ProcessorConfig;

use constants::VERIFY_INPUT;

/// Result type alias for the weather event processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for weather event processing
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Record lacks the `type` discriminator
    #[error("Malformed message (missing 'type'). {trailer}", trailer = VERIFY_INPUT)]
    MissingType,

    /// Sample record is missing, or cannot represent, a required field
    #[error("Malformed sample message; {reason}. {trailer}", trailer = VERIFY_INPUT)]
    MalformedSample { reason: String },

    /// Control record lacks `command`
    #[error("Malformed control message (missing 'command'). {trailer}", trailer = VERIFY_INPUT)]
    MissingCommand,

    /// Control command is neither `snapshot` nor `reset`
    #[error("Unknown control command '{command}'. {trailer}", trailer = VERIFY_INPUT)]
    UnknownCommand { command: String },

    /// Discriminator is neither `sample` nor `control`
    #[error("Unknown message type '{message_type}'. {trailer}", trailer = VERIFY_INPUT)]
    UnknownType { message_type: String },

    /// Input line is not valid JSON
    #[error("Invalid JSON on line {line}: {source}. {trailer}", trailer = VERIFY_INPUT)]
    InvalidJson {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Output record could not be serialized
    #[error("Serialization error: {source}")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create a malformed sample error
    pub fn malformed_sample(reason: impl Into<String>) -> Self {
        Self::MalformedSample {
            reason: reason.into(),
        }
    }

    /// Create an unknown control command error
    pub fn unknown_command(command: impl Into<String>) -> Self {
        Self::UnknownCommand {
            command: command.into(),
        }
    }

    /// Create an unknown message type error
    pub fn unknown_type(message_type: impl Into<String>) -> Self {
        Self::UnknownType {
            message_type: message_type.into(),
        }
    }

    /// Create an invalid JSON error for a 1-based input line
    pub fn invalid_json(line: usize, source: serde_json::Error) -> Self {
        Self::InvalidJson { line, source }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// True when the error was caused by the caller's input rather than the system
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingType
                | Self::MalformedSample { .. }
                | Self::MissingCommand
                | Self::UnknownCommand { .. }
                | Self::UnknownType { .. }
                | Self::InvalidJson { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization { source: error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_end_with_trailer() {
        let errors = vec![
            Error::MissingType,
            Error::malformed_sample("missing required fields (timestamp)"),
            Error::MissingCommand,
            Error::unknown_command("rewind"),
            Error::unknown_type("reading"),
        ];

        for error in errors {
            assert!(error.is_input_error());
            assert!(
                error.to_string().ends_with(VERIFY_INPUT),
                "missing trailer: {}",
                error
            );
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::MissingType.to_string(),
            "Malformed message (missing 'type'). Please verify input."
        );
        assert_eq!(
            Error::unknown_command("rewind").to_string(),
            "Unknown control command 'rewind'. Please verify input."
        );
        assert_eq!(
            Error::unknown_type("reading").to_string(),
            "Unknown message type 'reading'. Please verify input."
        );
    }

    #[test]
    fn test_invalid_json_is_input_error() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error = Error::invalid_json(3, source);

        assert!(error.is_input_error());
        let message = error.to_string();
        assert!(message.starts_with("Invalid JSON on line 3:"));
        assert!(message.ends_with(VERIFY_INPUT));
    }

    #[test]
    fn test_system_errors_are_not_input_errors() {
        let io = Error::io(
            "read failed",
            std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        );
        assert!(!io.is_input_error());
        assert!(!Error::configuration("bad").is_input_error());
        assert!(!Error::processing_interrupted("ctrl-c").is_input_error());
    }
}
