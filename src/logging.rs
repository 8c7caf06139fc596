//! File-backed `tracing` setup. The terminal belongs to the UI, so logs go to disk.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use crate::config::{LogSettings, default_log_path};

#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("cannot determine a log file location")]
    NoPath,
    #[error("cannot create log directory {path}: {source}")]
    Dir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot open log file: {0}")]
    Appender(#[from] InitError),
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("cannot install log subscriber: {0}")]
    Install(String),
}

/// Resolve where log lines are written.
pub fn log_path(settings: &LogSettings) -> Option<PathBuf> {
    settings
        .file
        .as_deref()
        .map(PathBuf::from)
        .or_else(default_log_path)
}

/// Install the global subscriber. Keep the guard alive until exit so buffered
/// lines are flushed.
pub fn init(settings: &LogSettings) -> Result<WorkerGuard, LogInitError> {
    let path = log_path(settings).ok_or(LogInitError::NoPath)?;
    let dir = path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or(LogInitError::NoPath)?;

    fs::create_dir_all(&dir).map_err(|source| LogInitError::Dir {
        path: dir.clone(),
        source,
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(&dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| LogInitError::Install(e.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_log_file_wins() {
        let settings = LogSettings {
            level: "debug".into(),
            file: Some("/tmp/tonearm/custom.log".into()),
        };
        assert_eq!(
            log_path(&settings),
            Some(PathBuf::from("/tmp/tonearm/custom.log"))
        );
    }
}
