//! Error types for the ball-drop workflow.

use std::io;
use std::path::PathBuf;

use droptime::ReportError;
use droptrack::TrackError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::host::HostError;

/// Errors that can occur while running a workflow step.
#[derive(Error, Debug)]
pub enum Error {
    /// Curve generation failed.
    #[error(transparent)]
    Track(#[from] TrackError),

    /// The history report could not be read or reduced.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// The run configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The host rejected a request.
    #[error(transparent)]
    Host(#[from] HostError),

    /// Writing an output artifact failed.
    #[error("io error on {}: {source}", .path.display())]
    Io {
        /// Path being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The tracing subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for workflow steps.
pub type Result<T> = std::result::Result<T, Error>;
