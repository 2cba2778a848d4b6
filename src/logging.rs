use std::path::Path;

use anyhow::Context;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config;

pub const LOG_FILE_PREFIX: &str = "g6-expiry.log";
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Console plus daily-rotated JSON file logging under `G6_LOG_DIR`
/// (`./logs` when unset).
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_in(config::get_log_dir())
}

/// Same as [`init_logging`] with an explicit log directory.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging_in(log_dir: impl AsRef<Path>) -> anyhow::Result<()> {
    let log_dir = log_dir.as_ref();
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let resolutions_log = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_ansi(true),
        )
        .with(
            // JSON lines, one per resolution event
            tracing_subscriber::fmt::layer()
                .with_writer(resolutions_log)
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .json(),
        )
        .with(filter)
        .try_init()
        .context("Global tracing subscriber already installed")?;

    Ok(())
}
