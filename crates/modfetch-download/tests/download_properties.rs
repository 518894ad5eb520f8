//! End-to-end properties of a download run over fake ports.

mod common;

use std::sync::Arc;

use common::{CountingCache, FakeGraph};
use modfetch_core::{MainModule, ModuleDescriptor, ModuleMode};
use modfetch_download::{
    DownloadDeps, DownloadReport, DownloadRequest, FetchError, ModuleContext, ModuleKey,
    OutcomeRecord, Stage, download_modules,
};

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

fn deps(graph: FakeGraph, cache: &Arc<CountingCache>) -> DownloadDeps {
    let cache = Arc::clone(cache);
    DownloadDeps {
        graph: Arc::new(graph),
        cache,
    }
}

async fn run(deps: &DownloadDeps, patterns: &[&str], concurrency: usize) -> DownloadReport {
    let request =
        DownloadRequest::new(ModuleContext::default(), args(patterns)).with_concurrency(concurrency);
    download_modules(deps, &request).await.unwrap()
}

fn many_modules(n: usize) -> Vec<ModuleDescriptor> {
    (0..n)
        .map(|i| ModuleDescriptor::new(format!("example.org/m{i:02}"), "v1.0.0"))
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn outcome_count_excludes_main_and_directory_replacements() {
    let graph = FakeGraph::new(vec![
        ModuleDescriptor::main_module("example.org/app"),
        ModuleDescriptor::new("example.org/a", "v1.0.0"),
        ModuleDescriptor::new("example.org/local", "v0.3.0")
            .replaced_by(ModuleDescriptor::new("../local", "")),
        ModuleDescriptor::with_error("example.org/gone", "v0.0.1", "unknown revision"),
        ModuleDescriptor::new("example.org/b", "v1.2.0"),
    ]);
    let cache = Arc::new(CountingCache::new());
    let ctx = ModuleContext::new(
        ModuleMode::On,
        Some(MainModule::new("example.org/app", "/src/app")),
    );

    let report = download_modules(&deps(graph, &cache), &DownloadRequest::new(ctx, vec![]))
        .await
        .unwrap();

    let paths: Vec<&str> = report.outcomes.iter().map(|o| o.path.as_str()).collect();
    assert_eq!(paths, vec!["example.org/a", "example.org/gone", "example.org/b"]);
    assert_eq!(cache.pipelines_started(), 2);
    assert_eq!(report.failure_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn duplicate_request_runs_pipeline_once() {
    let graph = FakeGraph::new(vec![ModuleDescriptor::new("example.org/a", "v1.0.0")]);
    let cache = Arc::new(CountingCache::new().with_delays(7, 3));
    let deps = deps(graph, &cache);

    let report = run(
        &deps,
        &["example.org/a@v1.0.0", "example.org/a@v1.0.0", "example.org/a"],
        4,
    )
    .await;

    let key = ModuleKey::new("example.org/a", "v1.0.0");
    assert_eq!(report.outcomes.len(), 1);
    for stage in Stage::ALL {
        assert_eq!(cache.calls(&key, stage), 1, "stage {stage} ran more than once");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn order_is_stable_under_random_delays() {
    let modules = many_modules(24);
    let expected: Vec<String> = modules.iter().map(|m| m.path.clone()).collect();

    for seed in 0..5 {
        let cache = Arc::new(CountingCache::new().with_delays(seed, 6));
        let deps = deps(FakeGraph::new(modules.clone()), &cache);

        let report = run(&deps, &["all"], 5).await;

        let paths: Vec<String> = report.outcomes.iter().map(|o| o.path.clone()).collect();
        assert_eq!(paths, expected, "order changed with seed {seed}");
        assert!(!report.failed());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrency_bound_is_respected() {
    let cache = Arc::new(CountingCache::new().with_delays(3, 5));
    let deps = deps(FakeGraph::new(many_modules(16)), &cache);

    let report = run(&deps, &["all"], 3).await;

    assert_eq!(report.outcomes.len(), 16);
    assert!(cache.peak_in_flight() <= 3, "peak was {}", cache.peak_in_flight());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn failure_in_one_module_is_isolated() {
    let graph = FakeGraph::new(vec![
        ModuleDescriptor::new("example.org/a", "v1.0.0"),
        ModuleDescriptor::new("example.org/b", "v1.0.0"),
    ]);
    let cache = Arc::new(CountingCache::new().failing("example.org/a", Stage::Archive));
    let deps = deps(graph, &cache);

    let report = run(&deps, &["all"], 2).await;

    let a = &report.outcomes[0];
    assert!(a.info.is_some());
    assert!(a.manifest.is_some());
    assert!(a.manifest_sum.is_some());
    assert!(a.archive.is_none());
    assert_eq!(
        a.error.as_ref().and_then(FetchError::failed_stage),
        Some(Stage::Archive)
    );
    assert_eq!(
        cache.calls(&ModuleKey::new("example.org/a", "v1.0.0"), Stage::Extract),
        0
    );
    assert!(report.outcomes[1].is_complete());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn repeated_runs_yield_identical_outcomes() {
    let cache = Arc::new(CountingCache::new().with_delays(11, 2));
    let deps = deps(FakeGraph::new(many_modules(6)), &cache);

    let first = run(&deps, &["all"], 3).await;
    let second = run(&deps, &["all"], 3).await;

    assert_eq!(first, second);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn archive_checksum_failure_scenario() {
    let graph = FakeGraph::new(vec![
        ModuleDescriptor::new("example.org/a", "v1.0.0"),
        ModuleDescriptor::new("example.org/b", "v2.0.0"),
    ]);
    let cache = Arc::new(CountingCache::new().failing("example.org/b", Stage::ArchiveChecksum));
    let deps = deps(graph, &cache);

    let report = run(
        &deps,
        &["example.org/a@v1.0.0", "example.org/a@v1.0.0", "example.org/b@v2.0.0"],
        2,
    )
    .await;

    assert_eq!(report.outcomes.len(), 2);
    assert!(report.failed());
    assert_eq!(
        cache.calls(&ModuleKey::new("example.org/a", "v1.0.0"), Stage::Info),
        1
    );

    let mut out = Vec::new();
    report.write_json(&mut out).unwrap();
    let records: Vec<OutcomeRecord> = serde_json::Deserializer::from_slice(&out)
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records.len(), 2);

    let a = &records[0];
    assert_eq!(a.path, "example.org/a");
    assert!(a.error.is_none());
    for field in [&a.info, &a.manifest, &a.archive, &a.dir, &a.sum, &a.manifest_sum] {
        assert!(field.is_some());
    }

    let b = &records[1];
    assert_eq!(b.path, "example.org/b");
    assert_eq!(b.version, "v2.0.0");
    assert!(b.info.is_some());
    assert!(b.manifest.is_some());
    assert!(b.manifest_sum.is_some());
    assert!(b.error.as_deref().unwrap().contains("archive checksum"));
    assert!(b.archive.is_none());
    assert!(b.sum.is_none());
    assert!(b.dir.is_none());
}

#[tokio::test]
async fn unknown_pattern_is_recorded_not_fatal() {
    let graph = FakeGraph::new(vec![ModuleDescriptor::new("example.org/a", "v1.0.0")]);
    let cache = Arc::new(CountingCache::new());
    let deps = deps(graph, &cache);

    let report = run(&deps, &["example.org/missing@v1.0.0", "example.org/a"], 10).await;

    assert_eq!(report.outcomes.len(), 2);
    assert!(matches!(
        report.outcomes[0].error,
        Some(FetchError::Resolution { .. })
    ));
    assert!(report.outcomes[1].is_complete());
}

#[tokio::test]
async fn modules_off_fails_before_fetching() {
    let cache = Arc::new(CountingCache::new());
    let deps = deps(FakeGraph::default(), &cache);
    let request = DownloadRequest::new(
        ModuleContext::new(ModuleMode::Off, None),
        args(&["example.org/a"]),
    );

    let err = download_modules(&deps, &request).await.unwrap_err();

    assert!(matches!(err, FetchError::Configuration { .. }));
    assert_eq!(cache.pipelines_started(), 0);
}
