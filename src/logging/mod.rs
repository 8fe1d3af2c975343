//! Tracing subscriber initialization.
//!
//! The desktop shell runs headless of any console, so logs go to a
//! file under the platform state directory where `tail -f` can watch
//! them. `RUST_LOG` is respected; the default level is "info".

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log directory could not be created or the path has no
    /// usable file name.
    #[error("unusable log path {path}: {reason}")]
    LogPath {
        /// The offending log path.
        path: PathBuf,
        /// Why it cannot be used.
        reason: String,
    },

    /// A tracing subscriber was already installed for this process.
    #[error("tracing subscriber already initialized")]
    AlreadyInitialized,
}

/// Resolve the default log file path.
///
/// `<state dir>/chatview/chatview.log`, falling back to the current
/// directory when the platform state dir cannot be determined.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("chatview").join("chatview.log")
    } else {
        PathBuf::from("chatview.log")
    }
}

/// Initialize the tracing subscriber with file-based logging.
///
/// Creates the log directory if missing. No ANSI escapes are written,
/// keeping the file greppable.
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    let directory = log_path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(directory) = directory {
        std::fs::create_dir_all(directory).map_err(|error| LoggingError::LogPath {
            path: log_path.to_path_buf(),
            reason: error.to_string(),
        })?;
    }

    let file_name = log_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| LoggingError::LogPath {
            path: log_path.to_path_buf(),
            reason: "no file name component".to_string(),
        })?;

    let appender = tracing_appender::rolling::never(
        directory.unwrap_or_else(|| Path::new(".")),
        file_name,
    );

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(appender)
        .with_ansi(false)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // Only one subscriber can ever be installed per process, so these
    // tests assert on the filesystem side effects and tolerate
    // AlreadyInitialized from whichever test ran first.

    #[test]
    #[serial(tracing_init)]
    fn init_creates_the_log_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let log_file = dir.path().join("nested").join("chatview.log");

        match init(&log_file) {
            Ok(()) | Err(LoggingError::AlreadyInitialized) => {}
            Err(error) => panic!("unexpected init failure: {error}"),
        }

        assert!(log_file.parent().expect("has parent").exists());
    }

    #[test]
    #[serial(tracing_init)]
    fn init_accepts_an_existing_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let log_file = dir.path().join("chatview.log");

        match init(&log_file) {
            Ok(()) | Err(LoggingError::AlreadyInitialized) => {}
            Err(error) => panic!("unexpected init failure: {error}"),
        }
    }

    #[test]
    fn default_log_path_ends_with_the_crate_log_file() {
        assert!(default_log_path().ends_with("chatview.log"));
    }
}
