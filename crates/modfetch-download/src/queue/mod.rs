//! Deduplicating bounded scheduler.
//!
//! [`Work`] runs a worker over keyed items with a fixed concurrency cap.
//!
//! # Guarantees
//!
//! - Each distinct key is executed at most once per `Work`, however many
//!   times it is added
//! - At most `concurrency` worker invocations are in flight
//! - Items may be added while draining, including from inside a worker
//! - [`Work::drain`] returns only once every added item has finished
//!
//! # Concurrency Model
//!
//! - Worker invocations are tokio tasks on the multi-threaded runtime
//! - The state lock is a `std::sync::Mutex` and is never held across `.await`
//! - `Notify` wakes the drain loop when an item is added mid-drain
//! - No cancellation: a failing or panicking item never stops the others

mod state;

use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tokio::task::JoinSet;

use state::WorkState;

/// A set of keyed work items processed at most once per key.
pub struct Work<K, T> {
    state: Mutex<WorkState<K, T>>,
    added: Notify,
}

impl<K, T> Work<K, T>
where
    K: Eq + Hash + Send,
    T: Send + 'static,
{
    /// Create an empty work set.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(WorkState::new()),
            added: Notify::new(),
        }
    }

    /// Register `item` under `key`.
    ///
    /// Non-blocking. If `key` was already registered (pending, running or
    /// finished) this is a no-op and returns `false`.
    pub fn add(&self, key: K, item: T) -> bool {
        let added = self.lock().add(key, item);
        if added {
            self.added.notify_one();
        }
        added
    }

    /// Number of distinct keys registered so far.
    pub fn len(&self) -> usize {
        self.lock().seen_len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `worker` over every registered item, at most `concurrency` at a time.
    ///
    /// Returns once all items, including those added while draining, have
    /// finished. A `concurrency` of zero is treated as one.
    pub async fn drain<F, Fut>(self: &Arc<Self>, concurrency: usize, worker: F)
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let limit = concurrency.max(1);
        let worker = Arc::new(worker);
        let mut running = JoinSet::new();

        loop {
            while running.len() < limit {
                let Some(item) = self.lock().next() else {
                    break;
                };
                let worker = Arc::clone(&worker);
                running.spawn(async move { worker(item).await });
            }

            if running.is_empty() {
                if self.lock().has_pending() {
                    continue;
                }
                break;
            }

            tokio::select! {
                joined = running.join_next() => {
                    if let Some(Err(e)) = joined {
                        tracing::error!(
                            target: "modfetch.download",
                            error = %e,
                            "work item task failed"
                        );
                    }
                }
                () = self.added.notified() => {}
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, WorkState<K, T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, T> Default for Work<K, T>
where
    K: Eq + Hash + Send,
    T: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
