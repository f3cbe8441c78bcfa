//! Logging setup for plotsight.
//!
//! Console output plus daily-rotating files in the platform data directory.
//! Library code only uses `tracing` macros; installing a subscriber is left to
//! the binary (or to whatever host embeds the library).
//!
//! ```no_run
//! plotsight::logging::init().expect("Failed to initialize logging");
//! tracing::info!("ready");
//! ```

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing::Subscriber;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// Rotated files kept per prefix.
const RETAINED_LOG_FILES: usize = 10;

/// Gets the log directory, creating it when missing.
pub fn get_log_dir() -> Result<PathBuf> {
    let log_dir = crate::utils::standard_paths().logs_dir;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    Ok(log_dir)
}

fn env_filter() -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")
}

fn daily_appender(dir: &Path, prefix: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(RETAINED_LOG_FILES)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)
        .with_context(|| format!("Failed to create {prefix} log appender"))
}

fn file_layer<S>(writer: RollingFileAppender) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .with_writer(writer)
}

/// Initializes console and file logging.
///
/// Creates two rotating files in [`get_log_dir`]:
/// - `plotsight.<date>.log`: everything that passes `RUST_LOG` (default `info`)
/// - `error.<date>.log`: warnings and errors only, which is where skipped
///   charts and insights end up
///
/// # Errors
///
/// Returns error if the log directory or file appenders cannot be created.
pub fn init() -> Result<()> {
    let log_dir = get_log_dir()?;
    let all_logs = daily_appender(&log_dir, "plotsight")?;
    let error_logs = daily_appender(&log_dir, "error")?;

    tracing_subscriber::registry()
        .with(env_filter()?)
        .with(fmt::layer().with_line_number(true).with_writer(std::io::stderr))
        .with(file_layer(all_logs))
        .with(file_layer(error_logs).with_filter(EnvFilter::new("warn")))
        .try_init()
        .context("A global subscriber is already installed")?;

    tracing::info!(log_dir = %log_dir.display(), "Logging initialized");
    Ok(())
}

/// Initializes console-only logging on stderr.
///
/// # Errors
///
/// Returns error if a global subscriber is already installed.
pub fn init_console() -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter()?)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("A global subscriber is already installed")?;
    Ok(())
}
