// src/logging.rs

//! Installs the `tracing` subscriber used by embedders and the test suite.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Initializes a compact fmt subscriber filtered by `RUST_LOG`, falling back to `log_level`.
///
/// Returns an error if a global subscriber has already been installed.
pub fn init_logging(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

/// Same as [`init_logging`] but routes output through the libtest capture and
/// ignores an already-installed subscriber.
pub fn init_test_logging(log_level: &str) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(log_level))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
