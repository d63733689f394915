//! Log setup: a plain-text log file plus warnings on the console.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LinkerConfig;
use crate::excel::ExcelError;

/// Log files above this size are discarded at startup
pub const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

/// Lines shown by the "view log" command
pub const DEFAULT_TAIL_LINES: usize = 20;

/// Map a configured level name onto a tracing filter directive.
pub fn filter_directive(level: &str) -> &'static str {
    match level.to_ascii_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" | "WARN" => "warn",
        "ERROR" => "error",
        _ => "info",
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
pub fn init_logging(config: &LinkerConfig) -> Result<(), ExcelError> {
    rotate_if_oversized(&config.log_file, MAX_LOG_BYTES)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .map_err(|e| {
            ExcelError::config_error(format!(
                "Failed to open log file {}: {}",
                config.log_file.display(),
                e
            ))
        })?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(&config.log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(LevelFilter::WARN),
        )
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .map_err(|e| ExcelError::config_error(format!("Failed to initialise logging: {}", e)))?;

    tracing::info!("=== Sheet Linker Started ===");
    Ok(())
}

/// Delete the log file once it grows past `max_bytes`.
pub fn rotate_if_oversized(path: &Path, max_bytes: u64) -> Result<bool, ExcelError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > max_bytes => {
            std::fs::remove_file(path).map_err(|e| {
                ExcelError::config_error(format!(
                    "Failed to remove oversized log {}: {}",
                    path.display(),
                    e
                ))
            })?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// The last `lines` lines of the log file.
pub fn tail_log(path: &Path, lines: usize) -> Result<Vec<String>, ExcelError> {
    if !path.exists() {
        return Err(ExcelError::invalid_input(
            "Log file not found yet. Process some files first.",
        ));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ExcelError::invalid_input(format!("Could not read log file: {}", e)))?;

    let all: Vec<&str> = content.lines().collect();
    let start = all.len().saturating_sub(lines);
    Ok(all[start..].iter().map(|l| l.trim_end().to_string()).collect())
}
