//! `FileProxyCache` against a fixture proxy on disk.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::TempDir;
use zip::write::SimpleFileOptions;

use modfetch_cache::{CacheLayout, FileProxyCache, ProxyLayout, hash_bytes};
use modfetch_core::{CacheError, ModuleCachePort, ModuleKey};

const MANIFEST: &str = r#"{ "module": "example.org/Lib" }"#;

fn key() -> ModuleKey {
    ModuleKey::new("example.org/Lib", "v1.4.0")
}

/// Publish `key` in the proxy with a two-file archive.
fn publish(proxy: &ProxyLayout, key: &ModuleKey) {
    let dir = proxy.version_dir(&key.path).unwrap();
    fs::create_dir_all(&dir).unwrap();
    fs::write(proxy.list_file(&key.path).unwrap(), format!("{}\n", key.version)).unwrap();
    fs::write(
        proxy.file(key, "info").unwrap(),
        format!(r#"{{"Version":"{}"}}"#, key.version),
    )
    .unwrap();
    fs::write(proxy.file(key, "json").unwrap(), MANIFEST).unwrap();

    let prefix = format!("{}@{}", key.path, key.version);
    let mut zip = zip::ZipWriter::new(fs::File::create(proxy.file(key, "zip").unwrap()).unwrap());
    for (name, body) in [("modfetch.json", MANIFEST), ("src/lib.txt", "pub fn lib() {}")] {
        zip.start_file(format!("{prefix}/{name}"), SimpleFileOptions::default())
            .unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

struct Fixture {
    _tmp: TempDir,
    proxy_root: std::path::PathBuf,
    cache_root: std::path::PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let proxy_root = tmp.path().join("proxy");
        let cache_root = tmp.path().join("cache");
        publish(&ProxyLayout::new(&proxy_root), &key());
        Self {
            _tmp: tmp,
            proxy_root,
            cache_root,
        }
    }

    fn cache(&self) -> FileProxyCache {
        FileProxyCache::new(
            ProxyLayout::new(&self.proxy_root),
            CacheLayout::new(&self.cache_root),
        )
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Artifacts {
    info: std::path::PathBuf,
    manifest: std::path::PathBuf,
    manifest_sum: String,
    archive: std::path::PathBuf,
    archive_sum: String,
    dir: std::path::PathBuf,
}

async fn fetch_all(cache: &FileProxyCache, key: &ModuleKey) -> Result<Artifacts, CacheError> {
    Ok(Artifacts {
        info: cache.fetch_info(key).await?,
        manifest: cache.fetch_manifest(key).await?,
        manifest_sum: cache.manifest_checksum(key).await?,
        archive: cache.fetch_archive(key).await?,
        archive_sum: cache.archive_checksum(key).await?,
        dir: cache.materialize_dir(key).await?,
    })
}

fn assert_under(path: &Path, root: &Path) {
    assert!(path.starts_with(root), "{} not under {}", path.display(), root.display());
}

#[tokio::test]
async fn all_stages_populate_the_cache() {
    let fixture = Fixture::new();
    let cache = fixture.cache();

    let artifacts = fetch_all(&cache, &key()).await.unwrap();

    for path in [&artifacts.info, &artifacts.manifest, &artifacts.archive] {
        assert_under(path, &fixture.cache_root);
        assert!(path.is_file());
    }
    assert!(artifacts.info.to_string_lossy().contains("example.org/!lib/@v/v1.4.0.info"));
    assert_eq!(artifacts.manifest_sum, hash_bytes(MANIFEST.as_bytes()));
    assert!(artifacts.archive_sum.starts_with("h1:"));
    assert_eq!(
        fs::read_to_string(artifacts.dir.join("src/lib.txt")).unwrap(),
        "pub fn lib() {}"
    );
}

#[tokio::test]
async fn second_run_needs_no_proxy() {
    let fixture = Fixture::new();
    let first = fetch_all(&fixture.cache(), &key()).await.unwrap();

    fs::remove_dir_all(&fixture.proxy_root).unwrap();
    let second = fetch_all(&fixture.cache(), &key()).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn missing_version_is_not_found() {
    let fixture = Fixture::new();
    let cache = fixture.cache();
    let missing = ModuleKey::new("example.org/Lib", "v9.9.9");

    let err = cache.fetch_info(&missing).await.unwrap_err();

    assert!(matches!(err, CacheError::NotFound { .. }));
}

#[tokio::test]
async fn published_checksum_mismatch_is_rejected() {
    let fixture = Fixture::new();
    let proxy = ProxyLayout::new(&fixture.proxy_root);
    fs::write(proxy.file(&key(), "ziphash").unwrap(), "h1:bogus\n").unwrap();
    let cache = fixture.cache();

    cache.fetch_archive(&key()).await.unwrap();
    let err = cache.archive_checksum(&key()).await.unwrap_err();

    assert!(matches!(
        err,
        CacheError::ChecksumMismatch { ref expected, .. } if expected == "h1:bogus"
    ));
}

#[tokio::test]
async fn published_checksum_match_is_accepted() {
    let fixture = Fixture::new();
    let reference = fetch_all(&fixture.cache(), &key()).await.unwrap();

    let other = Fixture::new();
    let proxy = ProxyLayout::new(&other.proxy_root);
    fs::write(proxy.file(&key(), "ziphash").unwrap(), &reference.archive_sum).unwrap();
    let artifacts = fetch_all(&other.cache(), &key()).await.unwrap();

    assert_eq!(artifacts.archive_sum, reference.archive_sum);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_materialization_of_one_key() {
    let fixture = Fixture::new();
    let cache = std::sync::Arc::new(fixture.cache());

    let mut handles = Vec::new();
    for _ in 0..4 {
        let cache = std::sync::Arc::clone(&cache);
        handles.push(tokio::spawn(async move { fetch_all(&cache, &key()).await }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap().unwrap());
    }
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn escaping_keys_never_touch_files_outside_the_roots() {
    let fixture = Fixture::new();
    let outside = fixture.proxy_root.parent().unwrap().to_path_buf();
    // A module that `../evil` would reach from the proxy root.
    publish(&ProxyLayout::new(&outside), &ModuleKey::new("evil", "v1.0.0"));
    let cache = fixture.cache();

    for key in [ModuleKey::new("../evil", "v1.0.0"), ModuleKey::new("", "v1.0.0")] {
        let err = fetch_all(&cache, &key).await.unwrap_err();
        assert!(matches!(err, CacheError::Other { .. }), "{err:?}");
        assert!(matches!(
            cache.materialize_dir(&key).await,
            Err(CacheError::Other { .. })
        ));
    }
    assert!(!outside.join("evil@v1.0.0").exists());
    assert!(!outside.join("download").exists());
}

fn temp_leftovers(root: &Path) -> Vec<std::path::PathBuf> {
    let mut found = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap().filter_map(Result::ok) {
            let path = entry.path();
            if entry.file_name().to_string_lossy().starts_with(".tmp-") {
                found.push(path.clone());
            }
            if path.is_dir() {
                stack.push(path);
            }
        }
    }
    found
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn separate_caches_share_one_root() {
    let fixture = Fixture::new();
    let caches = [
        std::sync::Arc::new(fixture.cache()),
        std::sync::Arc::new(fixture.cache()),
    ];

    let mut handles = Vec::new();
    for round in 0..4 {
        let cache = std::sync::Arc::clone(&caches[round % 2]);
        handles.push(tokio::spawn(async move { fetch_all(&cache, &key()).await }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap().unwrap());
    }
    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(
        fs::read_to_string(results[0].dir.join("src/lib.txt")).unwrap(),
        "pub fn lib() {}"
    );
    assert!(temp_leftovers(&fixture.cache_root).is_empty());
}
