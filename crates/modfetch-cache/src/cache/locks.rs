//! Per-key async locks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

use modfetch_core::ModuleKey;

/// One async mutex per module key, created on first use.
#[derive(Debug, Default)]
pub struct KeyLocks {
    locks: Mutex<HashMap<ModuleKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl KeyLocks {
    /// Wait for exclusive access to `key`.
    pub async fn acquire(&self, key: &ModuleKey) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(key.clone()).or_default())
        };
        lock.lock_owned().await
    }
}
