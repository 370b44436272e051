//! Logging system initialization
//!
//! Sets up tracing-based logging with file output to `<home>/gesture.log` and rotation on
//! every startup, keeping a configurable number of historical files.

use crate::config::LoggingPreferences;
use crate::error::{GestureError, Result, StringError};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt};

/// Base name of the active log file
pub const LOG_FILE_NAME: &str = "gesture.log";

/// Initialize the logging system
///
/// The filter comes from `RUST_LOG` when set, otherwise from `prefs.level`. Existing logs in
/// `log_dir` are rotated first so each run gets a fresh `gesture.log`.
pub fn init_logging(log_dir: &Path, prefs: &LoggingPreferences) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let log_path = log_dir.join(LOG_FILE_NAME);
    rotate_logs_on_startup(&log_path, prefs.max_log_files)?;

    // Rotation is handled above; the appender only ever writes one file
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("gesture")
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| GestureError::ConfigError(Box::new(e)))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&prefs.level))
        .map_err(|e| GestureError::ConfigError(Box::new(e)))?;

    let subscriber = fmt()
        .with_writer(file_appender)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| GestureError::ConfigError(Box::new(e)))?;

    tracing::info!("hangboard-gesture v{} started", env!("CARGO_PKG_VERSION"));

    Ok(())
}

/// Shift `gesture.log` → `gesture.log.1` → ... → `gesture.log.{max_files}`, deleting the
/// oldest. With `max_files == 0` the previous log is simply removed.
fn rotate_logs_on_startup(log_path: &Path, max_files: u8) -> Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let log_dir = log_path
        .parent()
        .ok_or_else(|| GestureError::ConfigError(StringError::new("Invalid log path")))?;
    let log_name = log_path
        .file_name()
        .ok_or_else(|| GestureError::ConfigError(StringError::new("Invalid log filename")))?
        .to_string_lossy();

    if max_files == 0 {
        std::fs::remove_file(log_path)?;
        return Ok(());
    }

    let oldest_log = log_dir.join(format!("{log_name}.{max_files}"));
    if oldest_log.exists() {
        std::fs::remove_file(&oldest_log)?;
    }

    for i in (1..max_files).rev() {
        let current_log = log_dir.join(format!("{log_name}.{i}"));
        if current_log.exists() {
            std::fs::rename(&current_log, log_dir.join(format!("{log_name}.{}", i + 1)))?;
        }
    }

    std::fs::rename(log_path, log_dir.join(format!("{log_name}.1")))?;

    Ok(())
}
