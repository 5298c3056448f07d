//! Error types for report parsing and reduction.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while reading or reducing a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The report could not be read or written.
    #[error("io error on {}: {source}", .path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The report ended before its header was complete.
    #[error("report header truncated: expected {expected} lines, found {found}")]
    TruncatedHeader {
        /// Header lines required.
        expected: usize,
        /// Lines actually present.
        found: usize,
    },

    /// A data line could not be parsed.
    #[error("malformed row at line {line}: {reason}")]
    MalformedRow {
        /// One-based line number in the report.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// The report contained a header but no data rows.
    #[error("report has no data rows")]
    NoDataRows,
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for report operations.
pub type ReportResult<T> = Result<T, ReportError>;
