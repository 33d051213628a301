use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured log filter
pub const LOG_ENV_VAR: &str = "TAGFIELD_LOG";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {source}")]
    OpenError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid log filter '{0}'")]
    FilterError(String),
    #[error("tracing init failed: {0}")]
    InitError(String),
}

/// Build the filter: `TAGFIELD_LOG` wins, then `default_level`
pub fn build_filter(default_level: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_env(LOG_ENV_VAR) {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_level)
            .map_err(|_| LoggingError::FilterError(default_level.to_string())),
    }
}

/// Send tracing output to `log_path`. Stdout belongs to the terminal UI,
/// so nothing is ever written there.
pub fn init_file_logging(log_path: &Path, default_level: &str) -> Result<(), LoggingError> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent).map_err(|source| LoggingError::OpenError {
            path: log_path.to_path_buf(),
            source,
        })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|source| LoggingError::OpenError {
            path: log_path.to_path_buf(),
            source,
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(default_level)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| LoggingError::InitError(e.to_string()))
}
