//! Tracing subscriber setup.
//!
//! The terminal is owned by the UI, so log lines go to a file instead of
//! stderr. ANSI colors are disabled to keep the file greppable.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{Context, Error, Result};

/// Resolve the filter: explicit directive, else `RUST_LOG`, else `info`.
pub fn build_filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(directive) => EnvFilter::try_new(directive)
            .map_err(|e| Error::config(format!("invalid log level '{directive}': {e}"))),
        None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))),
    }
}

/// Install a global subscriber appending to `log_file`.
pub fn init(log_file: &Path, level: Option<&str>) -> Result<()> {
    let filter = build_filter(level)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_ctx(|| format!("opening log file {}", log_file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| Error::config(format!("installing tracing subscriber: {e}")))?;

    tracing::info!(path = %log_file.display(), "logging initialised");
    Ok(())
}
