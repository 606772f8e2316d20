//! Read-through cache with a time-to-live in front of an operation.
//!
//! Entries are JSON envelopes `{"data": .., "timestamp": <epoch ms>}` stored
//! under `cache_<key>`. The key space is shared by every `CachedFetch` on the
//! same storage backend.
//!
//! `stale_while_revalidate` only means "serve stale data without fetching".
//! Nothing refreshes a stale entry in the background; a forced fetch does.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use crate::{
    config::{CacheConfig, CallOptions},
    error::{ExecuteError, OperationError},
    executor::Operation,
    storage::Storage,
    telemetry::log_error,
    time::TimeSource,
};

pub const CACHE_KEY_PREFIX: &str = "cache_";

pub fn storage_key(key: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{key}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    /// Write time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl<T> CacheEntry<T> {
    /// An entry exactly `ttl_ms` old is stale.
    pub fn is_stale(&self, now_ms: i64, ttl_ms: u64) -> bool {
        let ttl_ms = i64::try_from(ttl_ms).unwrap_or(i64::MAX);
        now_ms.saturating_sub(self.timestamp) >= ttl_ms
    }
}

/// What the in-memory cache currently holds for a key.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedData<T> {
    pub data: T,
    pub is_stale: bool,
}

pub struct CachedFetch<T, E> {
    key: String,
    config: CacheConfig,
    operation: Operation<T, E>,
    storage: Rc<dyn Storage>,
    time_source: TimeSource,
    fetch_fn: Rc<dyn Fn() -> LocalBoxFuture<'static, Result<T, E>>>,
    entry: RefCell<Option<CacheEntry<T>>>,
}

impl<T, E> CachedFetch<T, E>
where
    T: Clone + Serialize + DeserializeOwned + 'static,
    E: OperationError,
{
    /// Build the cache for `key`, loading whatever the storage already holds
    /// for it, stale or not.
    pub fn new<F, Fut>(
        key: impl Into<String>,
        config: CacheConfig,
        operation: Operation<T, E>,
        storage: Rc<dyn Storage>,
        time_source: TimeSource,
        fetch_fn: F,
    ) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        let key = key.into();
        let entry = read_entry::<T>(storage.as_ref(), &storage_key(&key));
        if let Some(entry) = &entry {
            tracing::debug!(
                key = %key,
                is_stale = entry.is_stale(time_source.now_ms(), config.ttl_ms),
                "loaded cached entry"
            );
        }

        Self {
            key,
            config,
            operation,
            storage,
            time_source,
            fetch_fn: Rc::new(move || fetch_fn().boxed_local()),
            entry: RefCell::new(entry),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn operation(&self) -> &Operation<T, E> {
        &self.operation
    }

    /// The in-memory entry, with staleness judged against the current time.
    pub fn cached(&self) -> Option<CachedData<T>> {
        let now_ms = self.time_source.now_ms();
        self.entry.borrow().as_ref().map(|entry| CachedData {
            data: entry.data.clone(),
            is_stale: entry.is_stale(now_ms, self.config.ttl_ms),
        })
    }

    /// Cached data if any, otherwise the last fetched data.
    pub fn data(&self) -> Option<T> {
        self.cached()
            .map(|cached| cached.data)
            .or_else(|| self.operation.state().data)
    }

    /// Serve from cache when allowed, otherwise fetch and store the result.
    pub async fn fetch(&self, force: bool) -> Result<T, ExecuteError<E>> {
        if !force {
            if let Some(cached) = self.cached() {
                if !cached.is_stale || self.config.stale_while_revalidate {
                    tracing::debug!(
                        key = %self.key,
                        is_stale = cached.is_stale,
                        "serving cached data"
                    );
                    return Ok(cached.data);
                }
            }
        }

        let fetch_fn = self.fetch_fn.clone();
        let (result, current) = self
            .operation
            .execute_tracked(move || fetch_fn(), CallOptions::default())
            .await;
        let data = result?;
        if !current {
            tracing::debug!(key = %self.key, "not caching a superseded fetch");
            return Ok(data);
        }

        let entry = CacheEntry {
            data: data.clone(),
            timestamp: self.time_source.now_ms(),
        };
        self.persist(&entry);
        *self.entry.borrow_mut() = Some(entry);
        Ok(data)
    }

    pub async fn refetch(&self) -> Result<T, ExecuteError<E>> {
        self.fetch(true).await
    }

    /// Drop the entry from storage and memory. The operation state keeps its
    /// data and error.
    pub fn invalidate(&self) {
        if let Err(e) = self.storage.remove_item(&storage_key(&self.key)) {
            log_error(e);
        }
        *self.entry.borrow_mut() = None;
        tracing::debug!(key = %self.key, "cache invalidated");
    }

    fn persist(&self, entry: &CacheEntry<T>) {
        let key = storage_key(&self.key);
        let value = match serde_json::to_string(entry) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, "failed to serialize cache entry: {e}");
                return;
            }
        };
        // best effort; a full storage only costs us the next cache hit
        if let Err(e) = self.storage.set_item(&key, &value) {
            log_error(e);
        }
    }
}

/// The cache a component is currently showing.
///
/// Activating a cache fetches through it and cancels the one it replaces, so
/// a slow fetch for a key the owner has moved away from cannot write into
/// its state or storage. Deactivating cancels the current cache.
pub struct ActiveCache<T, E> {
    current: RefCell<Option<Rc<CachedFetch<T, E>>>>,
}

impl<T, E> Default for ActiveCache<T, E> {
    fn default() -> Self {
        Self {
            current: RefCell::new(None),
        }
    }
}

impl<T, E> ActiveCache<T, E>
where
    T: Clone + Serialize + DeserializeOwned + 'static,
    E: OperationError,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Rc<CachedFetch<T, E>>> {
        self.current.borrow().clone()
    }

    /// Switch to `cache` right away and return its `fetch(false)`.
    pub fn activate(
        &self,
        cache: Rc<CachedFetch<T, E>>,
    ) -> LocalBoxFuture<'static, Result<T, ExecuteError<E>>> {
        let previous = self.current.replace(Some(cache.clone()));
        if let Some(previous) = previous {
            if !Rc::ptr_eq(&previous, &cache) {
                tracing::debug!(
                    from = previous.key(),
                    to = cache.key(),
                    "switching cache key"
                );
                previous.operation().cancel();
            }
        }
        async move { cache.fetch(false).await }.boxed_local()
    }

    pub fn deactivate(&self) {
        if let Some(current) = self.current.take() {
            current.operation().cancel();
        }
    }
}

fn read_entry<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Option<CacheEntry<T>> {
    let raw = match storage.get_item(key) {
        Ok(raw) => raw?,
        Err(e) => {
            log_error(e);
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(entry) => Some(entry),
        Err(e) => {
            tracing::warn!(key = %key, "ignoring unreadable cache entry: {e}");
            None
        }
    }
}
