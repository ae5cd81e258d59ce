//! Error types for the telemetry pipeline.
//!
//! Each failure is contained by the component that produces it; none of these
//! cross a dispatch tick.

use thiserror::Error;

/// Device open or read failure.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Failed to open {port}: {reason}")]
    Open { port: String, reason: String },

    #[error("Read error on {port}: {source}")]
    Read {
        port: String,
        #[source]
        source: std::io::Error,
    },
}

/// A line that names a channel but does not carry usable values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("{channel}: expected 3 comma-separated fields, found {found}")]
    FieldCount { channel: &'static str, found: usize },

    #[error("{channel}: field '{field}' has no ':' separator")]
    MissingSeparator { channel: &'static str, field: String },

    #[error("{channel}: '{value}' is not a number")]
    InvalidNumber { channel: &'static str, value: String },
}

/// CSV sink failure. Fatal to the current recording session only.
#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("Failed to create {path}: {source}")]
    Create {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write row: {0}")]
    Write(#[from] csv::Error),

    #[error("Failed to flush recording: {0}")]
    Flush(#[from] std::io::Error),

    #[error("No recording session is active")]
    NotActive,
}

/// Reader thread lifecycle errors.
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("A reader thread is still running; stop it before starting a new one")]
    AlreadyRunning,

    #[error("Failed to spawn reader thread: {0}")]
    Spawn(#[from] std::io::Error),
}
