//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Could not determine the system cache directory.
    #[error("Cannot determine system cache directory")]
    NoCacheDir,

    /// An empty path was provided.
    #[error("Path cannot be empty")]
    EmptyPath,

    /// The module mode value is not recognised.
    #[error("invalid {var} value {value:?} (expected on, off or auto)")]
    InvalidMode { var: &'static str, value: String },

    /// Failed to get the current working directory.
    #[error("Cannot determine current directory: {0}")]
    CurrentDir(String),

    /// The main module manifest could not be read.
    #[error("Failed to read manifest {path}: {reason}")]
    Manifest { path: PathBuf, reason: String },
}
