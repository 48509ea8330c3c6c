/*!
 * Error types for the dashmerge application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A times line without two extractable timestamp tokens
    #[error("Malformed cue in block {block}: expected two timestamps in '{line}'")]
    MalformedCue {
        /// 1-based position of the block among the retained blocks
        block: usize,
        /// The offending times line
        line: String,
    },

    /// Source path is missing or not a regular file
    #[error("Subtitle source is not a readable file: {0:?}")]
    SourceUnreadable(PathBuf),

    /// Source exists but its content could not be read
    #[error("Failed to read subtitle file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the styled document failed
    #[error("Failed to write subtitle file {path:?}: {source}")]
    DestinationWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while driving the external media tool
#[derive(Error, Debug)]
pub enum MediaError {
    /// The executable could not be found or started
    #[error("Required tool '{0}' is not available on this system")]
    ToolMissing(String),

    /// Spawning the process failed for another reason
    #[error("Failed to execute {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The process did not finish in time
    #[error("{stage} timed out after {secs} seconds")]
    Timeout { stage: String, secs: u64 },

    /// The process exited unsuccessfully
    #[error("{stage} failed: {stderr}")]
    Failed { stage: String, stderr: String },

    /// Preparing inputs for the tool failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from the media tool
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
