//! Tracing setup for coachctl
//!
//! The TUI owns the terminal, so interactive sessions log to a file.
//! Non-interactive commands log to stderr.
//!
//! Usage:
//!   coachctl --debug ...              # Debug logging
//!   RUST_LOG=coachctl_core=debug ...  # Fine-grained log control

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets RUST_LOG=debug if not already set)
    pub debug: bool,
    /// Append logs here instead of writing to stderr
    pub log_file: Option<PathBuf>,
}

fn env_filter(debug: bool) -> EnvFilter {
    let default = if debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialize tracing, to the log file when one is configured
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    match &config.log_file {
        Some(path) => init_file(config.debug, path),
        None => tracing_subscriber::fmt()
            .with_env_filter(env_filter(config.debug))
            .with_target(config.debug)
            .with_writer(std::io::stderr)
            .compact()
            .try_init()
            .map_err(|err| anyhow!(err)),
    }
}

fn init_file(debug: bool, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow!(err))
}
