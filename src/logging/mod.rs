//! Tracing subscriber setup.
//!
//! The terminal belongs to the station display, so logs go to a file. Follow
//! them with `tail -f` from another terminal.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparseable.
pub const DEFAULT_FILTER: &str = "info";

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// The directory path that failed to be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Log path has no usable file name
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Split a log file path into the directory to create and the file name.
///
/// A bare file name logs to the current directory.
fn split_log_path(log_path: &Path) -> Result<(PathBuf, &str), LoggingError> {
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok((directory, file_name))
}

/// `RUST_LOG` if set and valid, otherwise [`DEFAULT_FILTER`].
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global tracing subscriber writing to `log_path`.
///
/// Creates the log directory if missing. The file is appended to and never
/// rotated. ANSI colors are disabled.
///
/// # Errors
///
/// Fails if the path has no file name, the directory cannot be created, or a
/// subscriber is already installed.
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    let (directory, file_name) = split_log_path(log_path)?;

    std::fs::create_dir_all(&directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.clone(),
        source,
    })?;

    let file_appender = tracing_appender::rolling::never(&directory, file_name);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn split_log_path_separates_directory_and_file() {
        let (dir, file) = split_log_path(Path::new("/var/log/scanmatch/station.log")).unwrap();
        assert_eq!(dir, PathBuf::from("/var/log/scanmatch"));
        assert_eq!(file, "station.log");
    }

    #[test]
    fn split_log_path_bare_file_uses_current_directory() {
        let (dir, file) = split_log_path(Path::new("scanmatch.log")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(file, "scanmatch.log");
    }

    #[test]
    fn split_log_path_rejects_path_without_file_name() {
        assert!(matches!(
            split_log_path(Path::new("/")),
            Err(LoggingError::InvalidPath(_))
        ));
    }

    #[test]
    fn subscriber_already_set_message() {
        assert_eq!(
            LoggingError::SubscriberAlreadySet.to_string(),
            "Tracing subscriber already initialized"
        );
    }

    #[test]
    #[serial(tracing_init)]
    fn init_creates_log_directory_if_missing() {
        let test_dir = std::env::temp_dir().join("scanmatch_test_logs_create");
        let log_file = test_dir.join("test.log");
        let _ = fs::remove_dir_all(&test_dir);

        // May fail if another test already set the subscriber; the directory
        // is created before that check
        let _ = init(&log_file);

        assert!(
            test_dir.exists(),
            "Log directory should be created: {:?}",
            test_dir
        );

        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    #[serial(tracing_init)]
    fn second_init_reports_subscriber_already_set() {
        let test_dir = std::env::temp_dir().join("scanmatch_test_logs_twice");
        let log_file = test_dir.join("twice.log");

        let _ = init(&log_file);
        let second = init(&log_file);

        assert!(matches!(second, Err(LoggingError::SubscriberAlreadySet)));

        let _ = fs::remove_dir_all(&test_dir);
    }
}
