/*!
 * Error types for the substream crate.
 *
 * This module contains custom error types for the subtitle engine and the
 * media delivery path, using the thiserror crate for ergonomic error
 * definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Unrecognized file extension or conversion target
    #[error("Unsupported subtitle format: {0}")]
    UnsupportedFormat(String),

    /// The input is not recognizable as the target format at all
    #[error("Malformed subtitle document: {0}")]
    MalformedDocument(String),

    /// A file failed to parse; wraps the underlying codec error so callers
    /// see a single error kind for all parse failures
    #[error("Invalid subtitle file {path}: {source}")]
    InvalidSubtitle {
        /// Path of the file that failed to parse
        path: PathBuf,
        /// Underlying codec error
        #[source]
        source: Box<SubtitleError>,
    },

    /// The media duration could not be determined, so sync could not be
    /// checked. Out-of-sync subtitles are a normal `false` result, never
    /// this error.
    #[error("Sync validation failed: {0}")]
    SyncValidationFailed(#[from] ProbeError),

    /// No subtitle is available for the requested media and language
    #[error("No subtitle available for language '{language}'")]
    SubtitleNotFound {
        /// Requested language code
        language: String,
    },

    /// Error from a file operation
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while serving media byte ranges
#[derive(Error, Debug)]
pub enum StreamError {
    /// Range header outside file bounds (HTTP 416-equivalent)
    #[error("Range not satisfiable: '{header}' against size {size}")]
    InvalidRange {
        /// The offending Range header value
        header: String,
        /// Total file size in bytes
        size: u64,
    },

    /// Error from a file operation
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the external media duration probe
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The probe ran but reported no usable duration
    #[error("Media duration unavailable: {0}")]
    Unavailable(String),

    /// The probe itself failed to run or returned an error
    #[error("Probe failed: {0}")]
    Failed(String),
}
