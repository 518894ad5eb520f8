//! Configuration for a download run.
//!
//! This module answers three questions before any fetching happens:
//! - Is module mode enabled? ([`ModuleMode`])
//! - Is there a main module, and where is its root? ([`find_module_root`])
//! - Where do the cache and the file proxy live? ([`ResolvedPaths`])
//!
//! # Design
//!
//! - Pure resolvers take explicit values so they are testable
//! - Thin `*_from_env` wrappers read the process environment
//! - No terminal I/O; adapters decide how to report problems

mod error;
mod mode;
mod paths;
mod root;

use std::path::PathBuf;

pub use error::ConfigError;
pub use mode::{MODULES_ENV, ModuleMode};
pub use paths::{CACHE_ENV, PROXY_ENV, PathSource, ResolvedPaths, default_cache_root};
pub use root::{MANIFEST_FILE, find_module_root};

/// Fixed number of modules fetched concurrently.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// The main module of the current workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainModule {
    /// Module path declared by the manifest.
    pub path: String,
    /// Directory containing the manifest.
    pub root: PathBuf,
}

impl MainModule {
    /// Create a new main module.
    pub fn new(path: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            root: root.into(),
        }
    }

    /// Whether `arg` names this module (bare or with a moving-version query).
    pub fn is_named_by(&self, arg: &str) -> bool {
        if arg == self.path {
            return true;
        }
        arg.strip_prefix(self.path.as_str())
            .and_then(|rest| rest.strip_prefix('@'))
            .is_some_and(|query| matches!(query, "latest" | "upgrade" | "patch"))
    }
}

/// Environment a download run executes in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleContext {
    /// Whether module mode is enabled.
    pub mode: ModuleMode,
    /// The main module, when running inside a module root.
    pub main: Option<MainModule>,
}

impl ModuleContext {
    /// Create a context.
    pub const fn new(mode: ModuleMode, main: Option<MainModule>) -> Self {
        Self { mode, main }
    }

    /// Whether a main module root was found.
    pub const fn has_mod_root(&self) -> bool {
        self.main.is_some()
    }
}
