//! Module fetch pipeline.
//!
//! The worker takes one resolved key and drives it through the six cache
//! stages in order, stopping at the first failure. It operates on a value
//! key and a shared cache port, with no access to the scheduler's state.
//!
//! # Design Principles
//!
//! - Stage outputs are recorded on the outcome as each stage succeeds
//! - The first failing stage ends the pipeline; nothing is retried
//! - An archive path is only recorded together with its checksum

use std::sync::{Mutex, PoisonError};

use modfetch_core::{CacheError, FetchError, FetchOutcome, ModuleCachePort, ModuleKey, Stage};

/// Position-indexed storage for one module's outcome.
///
/// Slots are created in resolution order before scheduling, so the report
/// order never depends on completion order. Only the worker that owns the
/// key writes to its slot.
#[derive(Debug)]
pub struct OutcomeSlot {
    key: ModuleKey,
    outcome: Mutex<Option<FetchOutcome>>,
}

impl OutcomeSlot {
    /// Create an empty slot awaiting the pipeline.
    pub const fn pending(key: ModuleKey) -> Self {
        Self {
            key,
            outcome: Mutex::new(None),
        }
    }

    /// Create a slot that already holds a final outcome.
    pub const fn settled(key: ModuleKey, outcome: FetchOutcome) -> Self {
        Self {
            key,
            outcome: Mutex::new(Some(outcome)),
        }
    }

    /// The key this slot belongs to.
    pub const fn key(&self) -> &ModuleKey {
        &self.key
    }

    /// Store the final outcome.
    pub fn store(&self, outcome: FetchOutcome) {
        *self.outcome.lock().unwrap_or_else(PoisonError::into_inner) = Some(outcome);
    }

    /// Take the outcome out of the slot.
    ///
    /// A slot whose worker never stored anything yields an `Incomplete` error.
    pub fn take(&self) -> FetchOutcome {
        self.outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_else(|| {
                FetchOutcome::failed(&self.key, FetchError::incomplete(self.key.clone()))
            })
    }
}

/// Run the fetch pipeline for one module.
///
/// Always returns an outcome; a failed stage is recorded in `outcome.error`.
pub async fn fetch_module(cache: &dyn ModuleCachePort, key: &ModuleKey) -> FetchOutcome {
    let mut outcome = FetchOutcome::new(key);
    if let Err(error) = run_stages(cache, key, &mut outcome).await {
        tracing::debug!(
            target: "modfetch.download",
            module = %key,
            error = %error,
            "module fetch failed"
        );
        outcome.error = Some(error);
    } else {
        tracing::debug!(target: "modfetch.download", module = %key, "module fetched");
    }
    outcome
}

async fn run_stages(
    cache: &dyn ModuleCachePort,
    key: &ModuleKey,
    outcome: &mut FetchOutcome,
) -> Result<(), FetchError> {
    outcome.info = Some(stage(key, Stage::Info, cache.fetch_info(key).await)?);
    outcome.manifest = Some(stage(key, Stage::Manifest, cache.fetch_manifest(key).await)?);
    outcome.manifest_sum = Some(stage(
        key,
        Stage::ManifestChecksum,
        cache.manifest_checksum(key).await,
    )?);

    let archive = stage(key, Stage::Archive, cache.fetch_archive(key).await)?;
    let archive_sum = stage(
        key,
        Stage::ArchiveChecksum,
        cache.archive_checksum(key).await,
    )?;
    outcome.archive = Some(archive);
    outcome.archive_sum = Some(archive_sum);

    outcome.dir = Some(stage(key, Stage::Extract, cache.materialize_dir(key).await)?);
    Ok(())
}

/// Log a stage result and lift its error into a `FetchError`.
fn stage<V>(key: &ModuleKey, stage: Stage, result: Result<V, CacheError>) -> Result<V, FetchError> {
    tracing::debug!(
        target: "modfetch.download",
        module = %key,
        stage = %stage,
        ok = result.is_ok(),
        "stage finished"
    );
    result.map_err(|source| FetchError::stage(key.clone(), stage, source))
}
