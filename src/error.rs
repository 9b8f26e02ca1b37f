//! Error types for treewatch
//!
//! Uses `thiserror` for library errors; the CLI wraps them with `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for treewatch operations
pub type WatchResult<T> = Result<T, WatchError>;

/// Main error type for watcher construction and runs
#[derive(Error, Debug)]
pub enum WatchError {
    /// A configured pattern is not a valid regular expression
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Include roots must be absolute
    #[error("path is not absolute: {}", path.display())]
    NotAbsolutePath { path: PathBuf },

    /// Directory walk visited more entries than allowed
    #[error("recursion limit exceeded under {}: more than {limit} entries", root.display())]
    RecursionLimit { root: PathBuf, limit: usize },

    /// Error reported by the OS notification mechanism
    #[error("watch mechanism error: {0}")]
    Mechanism(#[from] notify::Error),

    /// IO error on a configured path
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The OS signal relay could not be installed
    #[error("failed to install signal handler: {0}")]
    SignalHandler(String),

    /// `run` was called on a watcher that already left the idle state
    #[error("watcher has already been started")]
    AlreadyStarted,

    /// Invalid configuration file
    #[error("invalid config in {}: {message}", file.display())]
    Config { file: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_absolute() {
        let err = WatchError::NotAbsolutePath {
            path: PathBuf::from("relative/dir"),
        };
        assert_eq!(err.to_string(), "path is not absolute: relative/dir");
    }

    #[test]
    fn test_error_display_recursion_limit() {
        let err = WatchError::RecursionLimit {
            root: PathBuf::from("/srv/app"),
            limit: 10,
        };
        assert_eq!(
            err.to_string(),
            "recursion limit exceeded under /srv/app: more than 10 entries"
        );
    }

    #[test]
    fn test_error_display_invalid_pattern_names_pattern() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = WatchError::InvalidPattern {
            pattern: "(unclosed".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("invalid pattern '(unclosed'"));
    }

    #[test]
    fn test_error_from_notify() {
        let err: WatchError = notify::Error::generic("inotify limit reached").into();
        assert!(matches!(err, WatchError::Mechanism(_)));
        assert!(err.to_string().contains("inotify limit reached"));
    }
}
