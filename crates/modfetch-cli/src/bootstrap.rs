//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter. All concrete implementations are instantiated here:
//! - Module mode and main module discovery (via modfetch-core)
//! - Module graph and module cache adapters (via modfetch-cache)
//!
//! Command handlers receive the composed context and delegate work to
//! `modfetch-download`.

use std::path::Path;
use std::sync::Arc;

use modfetch_cache::{CacheLayout, FileProxyCache, Manifest, ManifestGraph, ProxyLayout};
use modfetch_core::config::find_module_root;
use modfetch_core::{
    ConfigError, DEFAULT_CONCURRENCY, MainModule, ModuleContext, ModuleMode, ResolvedPaths,
};
use modfetch_download::DownloadDeps;

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Cache directory given on the command line.
    pub cache_dir: Option<String>,
    /// Proxy directory given on the command line.
    pub proxy_dir: Option<String>,
    /// Maximum number of concurrent module fetches.
    pub concurrency: usize,
}

impl CliConfig {
    /// Create config with default concurrency.
    pub const fn new(cache_dir: Option<String>, proxy_dir: Option<String>) -> Self {
        Self {
            cache_dir,
            proxy_dir,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    /// Resolved cache and proxy locations.
    pub paths: ResolvedPaths,
    /// Module mode and main module.
    pub module: ModuleContext,
    /// Ports used by download runs.
    pub deps: DownloadDeps,
    /// Maximum number of concurrent module fetches.
    pub concurrency: usize,
}

impl CliContext {
    /// Compose a context from already-resolved parts.
    pub fn new(
        paths: ResolvedPaths,
        module: ModuleContext,
        manifest: Option<Manifest>,
        concurrency: usize,
    ) -> Self {
        let proxy = ProxyLayout::new(&paths.proxy_root);
        let graph = match manifest {
            Some(manifest) => ManifestGraph::new(manifest, proxy.clone()),
            None => ManifestGraph::detached(proxy.clone()),
        };
        let cache = FileProxyCache::new(proxy, CacheLayout::new(&paths.cache_root));

        Self {
            paths,
            module,
            deps: DownloadDeps {
                graph: Arc::new(graph),
                cache: Arc::new(cache),
            },
            concurrency,
        }
    }
}

/// Discover the main module starting at `start`.
///
/// With module mode off no discovery happens.
pub fn discover_module(
    mode: ModuleMode,
    start: &Path,
) -> Result<(ModuleContext, Option<Manifest>), ConfigError> {
    if mode.is_off() {
        return Ok((ModuleContext::new(mode, None), None));
    }
    let Some(root) = find_module_root(start) else {
        return Ok((ModuleContext::new(mode, None), None));
    };
    let manifest = Manifest::load(&root)?;
    let main = MainModule::new(&manifest.module, root);
    Ok((ModuleContext::new(mode, Some(main)), Some(manifest)))
}

/// Bootstrap the CLI application.
///
/// This is the composition root. It:
/// 1. Reads the module mode from the environment
/// 2. Finds the main module from the working directory
/// 3. Resolves cache and proxy locations
/// 4. Builds the graph and cache adapters
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let mode = ModuleMode::from_env()?;
    let cwd = std::env::current_dir().map_err(|e| ConfigError::CurrentDir(e.to_string()))?;
    let (module, manifest) = discover_module(mode, &cwd)?;
    let paths = ResolvedPaths::resolve(config.cache_dir.as_deref(), config.proxy_dir.as_deref())?;

    tracing::debug!(
        target: "modfetch.cli",
        mode = %mode,
        main = module.main.as_ref().map(|m| m.path.as_str()),
        cache = %paths.cache_root.display(),
        proxy = %paths.proxy_root.display(),
        "bootstrapped"
    );

    Ok(CliContext::new(paths, module, manifest, config.concurrency))
}
