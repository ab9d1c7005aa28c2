//! Keyed cache of asynchronously constructed resources.
//!
//! The first caller for a key spawns the build as its own task and registers
//! a pending entry holding a shared handle to it; every later caller awaits
//! that same handle, so at most one build is in flight per key. The build
//! runs to completion even when every caller goes away. A failed build
//! leaves the key absent. Eviction
//! disposes completed entries immediately and marks pending ones so their
//! result is disposed as soon as the build settles.

use std::{
    collections::HashMap,
    fmt::Debug,
    future::Future,
    hash::Hash,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::task::JoinError;
use tracing::{debug, warn};

/// Classifies disposal failures that mean the resource was already torn down
/// by another path. Those are treated as a successful disposal.
pub trait DisposalError {
    fn is_already_released(&self) -> bool;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CacheEntryState {
    Pending,
    Ready,
}

type Disposer<R, E> = Arc<dyn Fn(R) -> BoxFuture<'static, Result<(), E>> + Send + Sync>;
type Computation<R, E> = Shared<BoxFuture<'static, Settlement<R, E>>>;
type Entries<K, R, E> = Arc<Mutex<HashMap<K, CacheEntry<R, E>>>>;

#[derive(Clone)]
enum Settlement<R, E> {
    Ready(R),
    Failed(E),
    Evicted(Option<E>),
}

enum CacheEntry<R, E> {
    Pending {
        generation: u64,
        computation: Computation<R, E>,
        evicted: bool,
    },
    Ready {
        resource: R,
        disposer: Disposer<R, E>,
    },
}

pub struct VersionedResourceCache<K, R, E> {
    entries: Entries<K, R, E>,
    generations: AtomicU64,
}

impl<K, R, E> VersionedResourceCache<K, R, E>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
    E: DisposalError + From<JoinError> + Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            generations: AtomicU64::new(0),
        }
    }

    /// Returns the live resource for `key`, joining a pending build or
    /// starting one. `build` runs at most once at a time for a given key; it
    /// may run again later if the previous attempt failed or was evicted.
    pub async fn get_or_create<B, BFut, D, DFut>(
        &self,
        key: &K,
        build: B,
        dispose: D,
    ) -> Result<R, E>
    where
        B: Fn() -> BFut + Send,
        BFut: Future<Output = Result<R, E>> + Send + 'static,
        D: Fn(R) -> DFut + Send + Sync + 'static,
        DFut: Future<Output = Result<(), E>> + Send + 'static,
    {
        let disposer: Disposer<R, E> = Arc::new(move |resource: R| dispose(resource).boxed());

        loop {
            // No await point between the lookup and the pending insert.
            let computation = {
                let mut entries = lock(&self.entries);
                match entries.get(key) {
                    Some(CacheEntry::Ready { resource, .. }) => return Ok(resource.clone()),
                    Some(CacheEntry::Pending { computation, .. }) => {
                        debug!(key = ?key, "joining pending build");
                        computation.clone()
                    }
                    None => {
                        let generation = self.generations.fetch_add(1, Ordering::Relaxed);
                        let computation = self.computation(
                            key.clone(),
                            generation,
                            build().boxed(),
                            Arc::clone(&disposer),
                        );
                        entries.insert(
                            key.clone(),
                            CacheEntry::Pending {
                                generation,
                                computation: computation.clone(),
                                evicted: false,
                            },
                        );
                        debug!(key = ?key, generation, "registered pending build");
                        computation
                    }
                }
            };

            match computation.await {
                Settlement::Ready(resource) => return Ok(resource),
                Settlement::Failed(error) => return Err(error),
                Settlement::Evicted(_) => {
                    debug!(key = ?key, "pending build was evicted before completion, retrying");
                }
            }
        }
    }

    /// Evicts `key`. A completed entry is disposed right away; a pending one
    /// keeps building and is disposed when it settles, which this call awaits.
    pub async fn evict(&self, key: &K) -> Result<(), E> {
        self.evict_matching(|candidate| candidate == key)
            .await
            .map(|_| ())
    }

    /// Evicts every entry whose key matches `predicate` and returns how many
    /// resources were disposed. All matching entries leave the map even when
    /// a disposal fails; the first failure is returned.
    pub async fn evict_matching<F>(&self, predicate: F) -> Result<usize, E>
    where
        F: Fn(&K) -> bool + Send,
    {
        let (ready, pending) = {
            let mut entries = lock(&self.entries);
            let keys = entries
                .keys()
                .filter(|key| predicate(key))
                .cloned()
                .collect::<Vec<_>>();

            let mut ready = Vec::new();
            let mut pending = Vec::new();
            for key in keys {
                if let Some(CacheEntry::Pending {
                    computation,
                    evicted,
                    ..
                }) = entries.get_mut(&key)
                {
                    *evicted = true;
                    pending.push(computation.clone());
                    continue;
                }

                if let Some(CacheEntry::Ready { resource, disposer }) = entries.remove(&key) {
                    debug!(key = ?key, "evicting cached resource");
                    ready.push((resource, disposer));
                }
            }
            (ready, pending)
        };

        let mut disposed = 0;
        let mut first_error = None;

        for (resource, disposer) in ready {
            match tolerate_released(disposer(resource).await) {
                Ok(()) => disposed += 1,
                Err(error) => {
                    first_error.get_or_insert(error);
                }
            }
        }

        for computation in pending {
            match computation.await {
                Settlement::Evicted(None) => disposed += 1,
                Settlement::Evicted(Some(error)) => {
                    first_error.get_or_insert(error);
                }
                Settlement::Ready(_) | Settlement::Failed(_) => {}
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(disposed),
        }
    }

    /// Evicts everything. Used on process shutdown.
    pub async fn drain(&self) -> Result<usize, E> {
        self.evict_matching(|_| true).await
    }

    pub fn state(&self, key: &K) -> Option<CacheEntryState> {
        lock(&self.entries).get(key).map(|entry| match entry {
            CacheEntry::Pending { .. } => CacheEntryState::Pending,
            CacheEntry::Ready { .. } => CacheEntryState::Ready,
        })
    }

    /// Keys whose build has completed and is still cached.
    pub fn ready_keys(&self) -> Vec<K> {
        lock(&self.entries)
            .iter()
            .filter(|(_, entry)| matches!(entry, CacheEntry::Ready { .. }))
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spawns the build so it settles even if every waiter is dropped. Must
    /// be called with the entries lock held, which keeps the task from
    /// settling before its pending entry exists.
    fn computation(
        &self,
        key: K,
        generation: u64,
        build: BoxFuture<'static, Result<R, E>>,
        disposer: Disposer<R, E>,
    ) -> Computation<R, E> {
        let entries = Arc::clone(&self.entries);
        let task = tokio::spawn({
            let entries = Arc::clone(&entries);
            let key = key.clone();
            async move {
                let outcome = build.await;
                settle(&entries, &key, generation, outcome, disposer).await
            }
        });

        async move {
            match task.await {
                Ok(settlement) => settlement,
                Err(join_error) => {
                    warn!(key = ?key, error = %join_error, "build task aborted");
                    forget_pending(&entries, &key, generation);
                    Settlement::Failed(E::from(join_error))
                }
            }
        }
        .boxed()
        .shared()
    }
}

impl<K, R, E> Default for VersionedResourceCache<K, R, E>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
    E: DisposalError + From<JoinError> + Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

async fn settle<K, R, E>(
    entries: &Mutex<HashMap<K, CacheEntry<R, E>>>,
    key: &K,
    generation: u64,
    outcome: Result<R, E>,
    disposer: Disposer<R, E>,
) -> Settlement<R, E>
where
    K: Eq + Hash + Clone,
    R: Clone,
    E: DisposalError,
{
    let evicted = {
        let mut entries = lock(entries);
        let (owned, evicted) = match entries.get(key) {
            Some(CacheEntry::Pending {
                generation: current,
                evicted,
                ..
            }) if *current == generation => (true, *evicted),
            _ => (false, true),
        };

        match &outcome {
            Ok(resource) if !evicted => {
                entries.insert(
                    key.clone(),
                    CacheEntry::Ready {
                        resource: resource.clone(),
                        disposer: Arc::clone(&disposer),
                    },
                );
            }
            _ if owned => {
                entries.remove(key);
            }
            _ => {}
        }
        evicted
    };

    match outcome {
        Ok(resource) if !evicted => Settlement::Ready(resource),
        Ok(resource) => Settlement::Evicted(tolerate_released(disposer(resource).await).err()),
        Err(error) => Settlement::Failed(error),
    }
}

fn forget_pending<K, R, E>(entries: &Mutex<HashMap<K, CacheEntry<R, E>>>, key: &K, generation: u64)
where
    K: Eq + Hash,
{
    let mut entries = lock(entries);
    if matches!(
        entries.get(key),
        Some(CacheEntry::Pending { generation: current, .. }) if *current == generation
    ) {
        entries.remove(key);
    }
}

fn tolerate_released<E: DisposalError>(result: Result<(), E>) -> Result<(), E> {
    match result {
        Err(error) if error.is_already_released() => Ok(()),
        other => other,
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
