//! Error types for module resolution and fetching.
//!
//! These errors are serializable and do not hold foreign error types like
//! `std::io::Error`; I/O failures are captured as kind and message strings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::stage::Stage;
use super::types::ModuleKey;

/// Error type for a download run.
///
/// `Configuration` and `Usage` abort a run before anything is scheduled.
/// `Resolution` and `Stage` are recorded on a single module's outcome.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum FetchError {
    /// Module mode is disabled.
    #[error("{message}")]
    Configuration {
        /// Detailed error message.
        message: String,
    },

    /// No targets can be resolved from the given arguments.
    #[error("{message}")]
    Usage {
        /// Detailed error message.
        message: String,
    },

    /// A pattern could not be resolved to a version.
    #[error("{path}: {message}")]
    Resolution {
        /// The module path (or pattern) that failed.
        path: String,
        /// Detailed error message.
        message: String,
    },

    /// A fetch pipeline stage failed.
    #[error("{key}: {stage}: {source}")]
    Stage {
        /// The module being fetched.
        key: ModuleKey,
        /// The stage that failed.
        stage: Stage,
        /// Underlying cache failure.
        source: CacheError,
    },

    /// The worker for a module stopped before recording an outcome.
    #[error("{key}: fetch did not complete")]
    Incomplete {
        /// The module being fetched.
        key: ModuleKey,
    },
}

impl FetchError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create a resolution error.
    pub fn resolution(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolution {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a stage error.
    pub const fn stage(key: ModuleKey, stage: Stage, source: CacheError) -> Self {
        Self::Stage { key, stage, source }
    }

    /// Create an incomplete-fetch error.
    pub const fn incomplete(key: ModuleKey) -> Self {
        Self::Incomplete { key }
    }

    /// Whether this error aborts the whole run.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::Usage { .. })
    }

    /// The failing stage, if this is a stage error.
    #[must_use]
    pub const fn failed_stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Error type reported by module cache adapters.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum CacheError {
    /// I/O error during file operations.
    #[error("I/O error ({kind}): {message}")]
    Io {
        /// The kind of I/O error (e.g., "`NotFound`").
        kind: String,
        /// Detailed error message.
        message: String,
    },

    /// The module version does not exist upstream.
    #[error("not found: {message}")]
    NotFound {
        /// What was not found.
        message: String,
    },

    /// A checksum did not match the recorded value.
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Expected checksum.
        expected: String,
        /// Actual checksum computed.
        actual: String,
    },

    /// The module archive is malformed.
    #[error("invalid archive: {message}")]
    InvalidArchive {
        /// Detailed error message.
        message: String,
    },

    /// General/uncategorized error.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl CacheError {
    /// Create an I/O error from kind and message strings.
    pub fn io(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error from a `std::io::Error`.
    ///
    /// A missing file is reported as `NotFound`.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        let kind = err.kind();
        if kind == std::io::ErrorKind::NotFound {
            return Self::not_found(err.to_string());
        }
        Self::Io {
            kind: format!("{kind:?}"),
            message: err.to_string(),
        }
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a checksum mismatch error.
    pub fn checksum_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::ChecksumMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an invalid archive error.
    pub fn invalid_archive(message: impl Into<String>) -> Self {
        Self::InvalidArchive {
            message: message.into(),
        }
    }

    /// Create a generic error.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}
