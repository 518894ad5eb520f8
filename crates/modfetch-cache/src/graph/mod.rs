//! Manifest-backed module graph.
//!
//! Resolves patterns against the main module manifest's direct requirements.
//! Version queries are answered from the file proxy's `@v/list` files.

mod query;

use async_trait::async_trait;

use modfetch_core::{CacheError, ListOptions, ModuleDescriptor, ModuleGraphPort};

use crate::error::io_error;
use crate::layout::{ProxyLayout, check_path};
use crate::manifest::Manifest;

pub use query::VersionQuery;

/// `ModuleGraphPort` implementation over a `modfetch.json` manifest.
#[derive(Debug, Clone)]
pub struct ManifestGraph {
    manifest: Manifest,
    proxy: ProxyLayout,
}

impl ManifestGraph {
    pub fn new(manifest: Manifest, proxy: ProxyLayout) -> Self {
        Self { manifest, proxy }
    }

    /// A graph with no main module; only `path@query` patterns resolve.
    pub fn detached(proxy: ProxyLayout) -> Self {
        Self::new(Manifest::default(), proxy)
    }

    fn has_main(&self) -> bool {
        !self.manifest.module.is_empty()
    }

    /// Versions of `path` known to the proxy, oldest first.
    async fn versions(&self, path: &str) -> Result<Vec<String>, CacheError> {
        let file = self.proxy.list_file(path)?;
        let text = tokio::fs::read_to_string(&file)
            .await
            .map_err(|e| io_error(&file, &e))?;
        Ok(query::sort_versions(
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
        ))
    }

    fn main_descriptor(&self) -> ModuleDescriptor {
        ModuleDescriptor::main_module(&self.manifest.module)
    }

    fn matches_prefix(path: &str, prefix: &str) -> bool {
        path == prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Build the descriptor of `path@version`, applying replacements and
    /// the extra information requested through `options`.
    async fn describe(&self, path: &str, version: &str, options: ListOptions) -> ModuleDescriptor {
        let mut desc = ModuleDescriptor::new(path, version);
        if let Some(replacement) = self.manifest.replacement_for(path, version) {
            desc = desc.replaced_by(replacement);
        }
        if !(options.versions || options.updates) {
            return desc;
        }

        match self.versions(path).await {
            Ok(available) => {
                if options.updates {
                    if let Some(newest) = query::newest(&available) {
                        if query::compare(newest, version).is_gt() {
                            desc.update = Some(Box::new(ModuleDescriptor::new(path, newest)));
                        }
                    }
                }
                if options.versions {
                    desc.versions = available;
                }
            }
            Err(e) => {
                tracing::debug!(
                    target: "modfetch.cache",
                    module = path,
                    error = %e,
                    "no version list"
                );
            }
        }
        desc
    }

    async fn resolve_query(
        &self,
        path: &str,
        raw: &str,
        options: ListOptions,
    ) -> ModuleDescriptor {
        if self.has_main() && path == self.manifest.module {
            return ModuleDescriptor::with_error(
                path,
                raw,
                "can't request explicit version of the main module",
            );
        }
        let query = match VersionQuery::parse(raw) {
            Ok(query) => query,
            Err(message) => return ModuleDescriptor::with_error(path, raw, message),
        };
        let current = self.manifest.required_version(path);
        let available = match &query {
            VersionQuery::Exact(_) => Vec::new(),
            _ => match self.versions(path).await {
                Ok(available) => available,
                Err(CacheError::NotFound { .. }) if current.is_some() => Vec::new(),
                Err(e) => return ModuleDescriptor::with_error(path, raw, e.to_string()),
            },
        };
        match query.select(current, &available) {
            Ok(version) => self.describe(path, &version, options).await,
            Err(message) => ModuleDescriptor::with_error(path, raw, message),
        }
    }

    async fn expand(&self, pattern: &str, options: ListOptions, out: &mut Vec<ModuleDescriptor>) {
        if pattern == "all" {
            if !self.has_main() {
                out.push(ModuleDescriptor::with_error(
                    pattern,
                    "",
                    "cannot match \"all\": no main module",
                ));
                return;
            }
            out.push(self.main_descriptor());
            for req in self.manifest.sorted_requirements() {
                out.push(self.describe(&req.path, &req.version, options).await);
            }
            return;
        }

        if let Some((path, raw)) = pattern.split_once('@') {
            if let Err(message) = check_path(path) {
                out.push(ModuleDescriptor::with_error(path, raw, message));
                return;
            }
            out.push(self.resolve_query(path, raw, options).await);
            return;
        }

        if let Some(prefix) = pattern.strip_suffix("/...") {
            let before = out.len();
            if self.has_main() && Self::matches_prefix(&self.manifest.module, prefix) {
                out.push(self.main_descriptor());
            }
            for req in self.manifest.sorted_requirements() {
                if Self::matches_prefix(&req.path, prefix) {
                    out.push(self.describe(&req.path, &req.version, options).await);
                }
            }
            if out.len() == before {
                tracing::warn!(
                    target: "modfetch.cache",
                    pattern,
                    "pattern matched no module dependencies"
                );
            }
            return;
        }

        if let Err(message) = check_path(pattern) {
            out.push(ModuleDescriptor::with_error(pattern, "", message));
        } else if self.has_main() && pattern == self.manifest.module {
            out.push(self.main_descriptor());
        } else if let Some(version) = self.manifest.required_version(pattern) {
            out.push(self.describe(pattern, version, options).await);
        } else if !self.has_main() {
            out.push(ModuleDescriptor::with_error(
                pattern,
                "",
                "a version is required outside a main module",
            ));
        } else {
            out.push(ModuleDescriptor::with_error(
                pattern,
                "",
                format!(
                    "module {pattern} is not a dependency of {}",
                    self.manifest.module
                ),
            ));
        }
    }
}

#[async_trait]
impl ModuleGraphPort for ManifestGraph {
    async fn list_modules(
        &self,
        patterns: &[String],
        options: ListOptions,
    ) -> Vec<ModuleDescriptor> {
        let mut out = Vec::new();
        for pattern in patterns {
            self.expand(pattern, options, &mut out).await;
        }
        tracing::debug!(
            target: "modfetch.cache",
            patterns = patterns.len(),
            modules = out.len(),
            "listed modules"
        );
        out
    }
}
