//! Cache and proxy location resolution.

use std::env;
use std::fmt;
use std::path::PathBuf;

use super::error::ConfigError;

/// Environment variable overriding the cache root.
pub const CACHE_ENV: &str = "MODFETCH_CACHE";

/// Environment variable overriding the file proxy root.
pub const PROXY_ENV: &str = "MODFETCH_PROXY";

/// How a path was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    /// The caller passed an explicit path.
    Explicit,
    /// The path came from an environment variable.
    EnvVar,
    /// Platform default.
    Default,
}

/// Cache and proxy locations for a run.
///
/// Resolution order for each path:
/// 1. Explicit value (highest priority)
/// 2. `MODFETCH_CACHE` / `MODFETCH_PROXY`
/// 3. Default: `<system cache dir>/modfetch` and `<cache root>/proxy`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Root of the module cache.
    pub cache_root: PathBuf,
    /// How the cache root was resolved.
    pub cache_source: PathSource,
    /// Root of the file proxy modules are fetched from.
    pub proxy_root: PathBuf,
    /// How the proxy root was resolved.
    pub proxy_source: PathSource,
}

impl ResolvedPaths {
    /// Resolve using the process environment.
    pub fn resolve(
        explicit_cache: Option<&str>,
        explicit_proxy: Option<&str>,
    ) -> Result<Self, ConfigError> {
        Self::resolve_with(
            explicit_cache,
            explicit_proxy,
            env::var(CACHE_ENV).ok().as_deref(),
            env::var(PROXY_ENV).ok().as_deref(),
        )
    }

    /// Resolve from explicit values and already-read environment values.
    pub fn resolve_with(
        explicit_cache: Option<&str>,
        explicit_proxy: Option<&str>,
        env_cache: Option<&str>,
        env_proxy: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let (cache_root, cache_source) = match pick(explicit_cache, env_cache)? {
            Some((path, source)) => (path, source),
            None => (default_cache_root()?, PathSource::Default),
        };

        let (proxy_root, proxy_source) = match pick(explicit_proxy, env_proxy)? {
            Some((path, source)) => (path, source),
            None => (cache_root.join("proxy"), PathSource::Default),
        };

        Ok(Self {
            cache_root,
            cache_source,
            proxy_root,
            proxy_source,
        })
    }
}

impl fmt::Display for PathSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Explicit => "explicit",
            Self::EnvVar => "env",
            Self::Default => "default",
        })
    }
}

impl fmt::Display for ResolvedPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "cache = {} ({})",
            self.cache_root.display(),
            self.cache_source
        )?;
        write!(
            f,
            "proxy = {} ({})",
            self.proxy_root.display(),
            self.proxy_source
        )
    }
}

fn pick(
    explicit: Option<&str>,
    env_value: Option<&str>,
) -> Result<Option<(PathBuf, PathSource)>, ConfigError> {
    if let Some(path) = explicit {
        if path.trim().is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        return Ok(Some((PathBuf::from(path.trim()), PathSource::Explicit)));
    }

    match env_value {
        Some(path) if !path.trim().is_empty() => {
            Ok(Some((PathBuf::from(path.trim()), PathSource::EnvVar)))
        }
        _ => Ok(None),
    }
}

/// Return the platform default cache root (`<system cache dir>/modfetch`).
pub fn default_cache_root() -> Result<PathBuf, ConfigError> {
    let base = dirs::cache_dir().ok_or(ConfigError::NoCacheDir)?;
    Ok(base.join("modfetch"))
}
