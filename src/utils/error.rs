//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting trace blocks from log lines
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed timestamp '{text}' on line {line_number}: {source}")]
    MalformedTimestamp {
        line_number: usize,
        text: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Failed to read log line: {0}")]
    ReadFailed(#[from] std::io::Error),
}

/// Errors that can occur while registering a trace block
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Trace block has a header but no frame lines: {0:?}")]
    MissingBody(String),
}

/// Errors that can occur while discovering log files
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Input directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    #[error("Failed to walk input directory: {0}")]
    WalkFailed(#[from] walkdir::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while mailing reports
#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid mail address '{address}': {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("No recipients given")]
    NoRecipients,

    #[error("SMTP password not set (export {0})")]
    MissingPassword(&'static str),

    #[error("Failed to read attachment {path}: {source}")]
    AttachmentFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build message: {0}")]
    BuildFailed(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    TransportFailed(#[from] lettre::transport::smtp::Error),
}
