//! CLI-specific error types and mappings.
//!
//! Maps run-level errors to exit codes and user-facing messages. Per-module
//! failures are not errors here; they are reported by the download handler.

use modfetch_core::{ConfigError, FetchError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// A run-level fetch failure that is neither usage nor configuration.
    #[error("{0}")]
    Fetch(String),

    /// Argument error.
    #[error("{0}")]
    Usage(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("{0}")]
    Config(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Fetch(_) => 1,
            Self::Usage(_) => 2, // EX_USAGE
            Self::Io(_) => 74,   // EX_IOERR
            Self::Config(_) => 78, // EX_CONFIG
        }
    }
}

impl From<FetchError> for CliError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Usage { message } => Self::Usage(message),
            FetchError::Configuration { message } => Self::Config(message),
            other => Self::Fetch(other.to_string()),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
