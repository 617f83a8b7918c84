//! Error types for reqdraft.
//!
//! Library crates use [`ReqDraftError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Only [`ReqDraftError::Input`] is ever returned from the public generation
//! entry points. Upstream AI failures are consumed by the orchestrator, and
//! sparse or ambiguous input is absorbed by domain defaults.

use std::path::PathBuf;

/// Top-level error type for all reqdraft operations.
#[derive(Debug, thiserror::Error)]
pub enum ReqDraftError {
    /// Caller supplied unusable input (e.g. an empty project name).
    #[error("input error: {message}")]
    Input { message: String },

    /// Generative completion service failed, timed out, or answered badly.
    #[error("upstream AI error: {0}")]
    Upstream(String),

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Input file or document parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ReqDraftError>;

impl ReqDraftError {
    /// Create an input error from any displayable message.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input {
            message: msg.into(),
        }
    }

    /// Create an upstream error from any displayable message.
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from the generative completion service.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = ReqDraftError::input("project name must not be empty");
        assert_eq!(err.to_string(), "input error: project name must not be empty");

        let err = ReqDraftError::upstream("HTTP 503 from completion endpoint");
        assert!(err.to_string().contains("HTTP 503"));
        assert!(err.is_upstream());
    }

    #[test]
    fn io_error_keeps_path() {
        let err = ReqDraftError::io(
            "/tmp/missing.toml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("missing.toml"));
        assert!(!err.is_upstream());
    }
}
