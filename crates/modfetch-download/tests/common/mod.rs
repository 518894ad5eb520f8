//! Shared fakes for download integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use modfetch_download::{CacheError, ModuleCachePort, ModuleGraphPort, ModuleKey, Stage};
use modfetch_core::{ListOptions, ModuleDescriptor};

/// Graph that answers every pattern by looking it up in a table.
///
/// Patterns of the form `path@version` map to that exact descriptor; `all`
/// returns every known descriptor in insertion order.
#[derive(Default)]
pub struct FakeGraph {
    modules: Vec<ModuleDescriptor>,
}

impl FakeGraph {
    pub fn new(modules: Vec<ModuleDescriptor>) -> Self {
        Self { modules }
    }
}

#[async_trait]
impl ModuleGraphPort for FakeGraph {
    async fn list_modules(
        &self,
        patterns: &[String],
        _options: ListOptions,
    ) -> Vec<ModuleDescriptor> {
        let mut out = Vec::new();
        for pattern in patterns {
            if pattern == "all" {
                out.extend(self.modules.iter().cloned());
                continue;
            }
            let (path, version) = pattern.split_once('@').unwrap_or((pattern, ""));
            let found = self
                .modules
                .iter()
                .find(|m| m.path == path && (version.is_empty() || m.version == version));
            match found {
                Some(desc) => out.push(desc.clone()),
                None => out.push(ModuleDescriptor::with_error(
                    path,
                    version,
                    format!("module {pattern} not found"),
                )),
            }
        }
        out
    }
}

/// Cache fake that counts calls, sleeps a pseudo-random amount per stage and
/// fails chosen (path, stage) pairs.
pub struct CountingCache {
    seed: u64,
    max_delay_ms: u64,
    failures: HashMap<String, Stage>,
    calls: Mutex<HashMap<(ModuleKey, Stage), usize>>,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl CountingCache {
    pub fn new() -> Self {
        Self {
            seed: 0,
            max_delay_ms: 0,
            failures: HashMap::new(),
            calls: Mutex::new(HashMap::new()),
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Sleep up to `max_delay_ms` per stage, derived from `seed` and the key.
    pub fn with_delays(mut self, seed: u64, max_delay_ms: u64) -> Self {
        self.seed = seed;
        self.max_delay_ms = max_delay_ms;
        self
    }

    /// Fail `stage` for every key with `path`.
    pub fn failing(mut self, path: &str, stage: Stage) -> Self {
        self.failures.insert(path.to_string(), stage);
        self
    }

    /// Number of times `stage` ran for `key`.
    pub fn calls(&self, key: &ModuleKey, stage: Stage) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&(key.clone(), stage))
            .copied()
            .unwrap_or(0)
    }

    /// Total number of `Info` calls across all keys.
    pub fn pipelines_started(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|((_, stage), _)| *stage == Stage::Info)
            .map(|(_, n)| n)
            .sum()
    }

    /// Highest number of `Info` stages observed in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn delay(&self, key: &ModuleKey, stage: Stage) -> Duration {
        if self.max_delay_ms == 0 {
            return Duration::ZERO;
        }
        let mut hasher = DefaultHasher::new();
        (self.seed, key, stage).hash(&mut hasher);
        Duration::from_millis(hasher.finish() % (self.max_delay_ms + 1))
    }

    async fn enter(&self, key: &ModuleKey, stage: Stage) -> Result<(), CacheError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry((key.clone(), stage))
            .or_default() += 1;

        let tracked = stage == Stage::Info;
        if tracked {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
        }
        tokio::time::sleep(self.delay(key, stage)).await;
        if tracked {
            self.active.fetch_sub(1, Ordering::SeqCst);
        }

        match self.failures.get(&key.path) {
            Some(failing) if *failing == stage => Err(CacheError::checksum_mismatch(
                format!("h1:{key}-expected"),
                format!("h1:{key}-actual"),
            )),
            _ => Ok(()),
        }
    }
}

impl Default for CountingCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModuleCachePort for CountingCache {
    async fn fetch_info(&self, key: &ModuleKey) -> Result<PathBuf, CacheError> {
        self.enter(key, Stage::Info).await?;
        Ok(PathBuf::from(format!("/cache/download/{}/@v/{}.info", key.path, key.version)))
    }

    async fn fetch_manifest(&self, key: &ModuleKey) -> Result<PathBuf, CacheError> {
        self.enter(key, Stage::Manifest).await?;
        Ok(PathBuf::from(format!("/cache/download/{}/@v/{}.json", key.path, key.version)))
    }

    async fn manifest_checksum(&self, key: &ModuleKey) -> Result<String, CacheError> {
        self.enter(key, Stage::ManifestChecksum).await?;
        Ok(format!("h1:{key}/manifest"))
    }

    async fn fetch_archive(&self, key: &ModuleKey) -> Result<PathBuf, CacheError> {
        self.enter(key, Stage::Archive).await?;
        Ok(PathBuf::from(format!("/cache/download/{}/@v/{}.zip", key.path, key.version)))
    }

    async fn archive_checksum(&self, key: &ModuleKey) -> Result<String, CacheError> {
        self.enter(key, Stage::ArchiveChecksum).await?;
        Ok(format!("h1:{key}"))
    }

    async fn materialize_dir(&self, key: &ModuleKey) -> Result<PathBuf, CacheError> {
        self.enter(key, Stage::Extract).await?;
        Ok(PathBuf::from(format!("/cache/{key}")))
    }
}
