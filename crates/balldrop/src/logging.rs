//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;
use crate::error::{Error, Result};

/// Installs the global subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `level` when it is set.
///
/// # Errors
///
/// Returns [`Error::Logging`] if a subscriber is already installed.
pub fn init(level: LogLevel, json: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| Error::Logging(e.to_string()))
}
