//! File-proxy-backed module cache.
//!
//! Artifacts are copied from a read-only proxy directory into the cache the
//! first time they are requested; later requests are served from the cache
//! without touching the proxy. Hashing and extraction run on the blocking
//! thread pool.

mod locks;

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use modfetch_core::{CacheError, ModuleCachePort, ModuleKey};

use crate::archive::extract_archive;
use crate::checksum::{hash_archive, hash_bytes};
use crate::error::io_error;
use crate::layout::{CacheLayout, ProxyLayout};

use locks::KeyLocks;

const INFO: &str = "info";
const MANIFEST: &str = "json";
const ARCHIVE: &str = "zip";
const ARCHIVE_HASH: &str = "ziphash";

/// `ModuleCachePort` implementation over a file proxy and a cache directory.
#[derive(Debug)]
pub struct FileProxyCache {
    proxy: ProxyLayout,
    cache: CacheLayout,
    locks: KeyLocks,
}

impl FileProxyCache {
    pub fn new(proxy: ProxyLayout, cache: CacheLayout) -> Self {
        Self {
            proxy,
            cache,
            locks: KeyLocks::default(),
        }
    }

    /// Copy one artifact from the proxy unless the cache already has it.
    async fn copy_if_absent(&self, key: &ModuleKey, ext: &str) -> Result<PathBuf, CacheError> {
        let dst = self.cache.download_file(key, ext)?;
        if exists(&dst).await? {
            return Ok(dst);
        }

        let src = self.proxy.file(key, ext)?;
        let bytes = tokio::fs::read(&src).await.map_err(|e| io_error(&src, &e))?;
        write_atomic(&dst, &bytes).await?;

        tracing::debug!(
            target: "modfetch.cache",
            module = %key,
            file = %dst.display(),
            "copied from proxy"
        );
        Ok(dst)
    }

    /// Checksum published by the proxy next to the archive, if any.
    async fn published_archive_sum(&self, key: &ModuleKey) -> Result<Option<String>, CacheError> {
        let file = self.proxy.file(key, ARCHIVE_HASH)?;
        match tokio::fs::read_to_string(&file).await {
            Ok(text) => Ok(Some(text.trim().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&file, &e)),
        }
    }
}

#[async_trait]
impl ModuleCachePort for FileProxyCache {
    async fn fetch_info(&self, key: &ModuleKey) -> Result<PathBuf, CacheError> {
        let _guard = self.locks.acquire(key).await;
        self.copy_if_absent(key, INFO).await
    }

    async fn fetch_manifest(&self, key: &ModuleKey) -> Result<PathBuf, CacheError> {
        let _guard = self.locks.acquire(key).await;
        self.copy_if_absent(key, MANIFEST).await
    }

    async fn manifest_checksum(&self, key: &ModuleKey) -> Result<String, CacheError> {
        let _guard = self.locks.acquire(key).await;
        let file = self.cache.download_file(key, MANIFEST)?;
        let bytes = tokio::fs::read(&file).await.map_err(|e| io_error(&file, &e))?;
        Ok(hash_bytes(&bytes))
    }

    async fn fetch_archive(&self, key: &ModuleKey) -> Result<PathBuf, CacheError> {
        let _guard = self.locks.acquire(key).await;
        self.copy_if_absent(key, ARCHIVE).await
    }

    async fn archive_checksum(&self, key: &ModuleKey) -> Result<String, CacheError> {
        let _guard = self.locks.acquire(key).await;

        let recorded = self.cache.download_file(key, ARCHIVE_HASH)?;
        if exists(&recorded).await? {
            let text = tokio::fs::read_to_string(&recorded)
                .await
                .map_err(|e| io_error(&recorded, &e))?;
            return Ok(text.trim().to_string());
        }

        let archive = self.cache.download_file(key, ARCHIVE)?;
        let sum = tokio::task::spawn_blocking(move || hash_archive(&archive))
            .await
            .map_err(|e| CacheError::other(format!("archive hashing task failed: {e}")))??;

        if let Some(expected) = self.published_archive_sum(key).await? {
            if expected != sum {
                tracing::warn!(
                    target: "modfetch.cache",
                    module = %key,
                    expected = %expected,
                    actual = %sum,
                    "archive checksum mismatch"
                );
                return Err(CacheError::checksum_mismatch(expected, sum));
            }
        }

        write_atomic(&recorded, format!("{sum}\n").as_bytes()).await?;
        Ok(sum)
    }

    async fn materialize_dir(&self, key: &ModuleKey) -> Result<PathBuf, CacheError> {
        let _guard = self.locks.acquire(key).await;

        let dir = self.cache.extract_dir(key)?;
        if exists(&dir).await? {
            return Ok(dir);
        }

        let archive = self.copy_if_absent(key, ARCHIVE).await?;
        let (dst, owned_key) = (dir.clone(), key.clone());
        tokio::task::spawn_blocking(move || extract_archive(&archive, &dst, &owned_key))
            .await
            .map_err(|e| CacheError::other(format!("extraction task failed: {e}")))??;

        tracing::debug!(
            target: "modfetch.cache",
            module = %key,
            dir = %dir.display(),
            "extracted module"
        );
        Ok(dir)
    }
}

async fn exists(path: &Path) -> Result<bool, CacheError> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|e| io_error(path, &e))
}

/// Write `bytes` to a uniquely named temporary sibling, then rename it over `dst`.
async fn write_atomic(dst: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    let (dst, bytes) = (dst.to_path_buf(), bytes.to_vec());
    tokio::task::spawn_blocking(move || persist(&dst, &bytes))
        .await
        .map_err(|e| CacheError::other(format!("write task failed: {e}")))?
}

fn persist(dst: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    let parent = dst
        .parent()
        .ok_or_else(|| CacheError::other(format!("no parent directory for {}", dst.display())))?;
    std::fs::create_dir_all(parent).map_err(|e| io_error(parent, &e))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".tmp-")
        .tempfile_in(parent)
        .map_err(|e| io_error(parent, &e))?;
    tmp.write_all(bytes).map_err(|e| io_error(tmp.path(), &e))?;
    tmp.persist(dst).map_err(|e| io_error(dst, &e.error))?;
    Ok(())
}
