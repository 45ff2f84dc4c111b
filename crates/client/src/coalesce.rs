//! In-flight request coalescing.
//!
//! While an operation for a key is running, further callers for the same key
//! await that operation instead of starting their own. The entry is removed
//! as soon as the operation completes, so the next call starts fresh.

use std::future::Future;
use std::hash::Hash;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

/// Table of operations currently running, keyed by `K`.
pub struct InFlight<K, T>
where
    K: Eq + Hash,
    T: Clone,
{
    pending: DashMap<K, Shared<BoxFuture<'static, T>>>,
}

impl<K, T> InFlight<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone + Send + Sync + 'static,
{
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: DashMap::new(),
        }
    }

    /// Runs the operation built by `start` unless one is already running for
    /// `key`, in which case its result is awaited and `start` is never called.
    pub async fn run<F, Fut>(&self, key: K, start: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let shared = match self.pending.entry(key.clone()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                let shared = start().boxed().shared();
                entry.insert(shared.clone());
                shared
            }
        };

        let output = shared.clone().await;
        self.pending
            .remove_if(&key, |_, running| running.ptr_eq(&shared));
        output
    }

    /// Returns true if an operation is running for `key`.
    #[must_use]
    pub fn is_running(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// Number of operations running.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if nothing is running.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<K, T> Default for InFlight<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
