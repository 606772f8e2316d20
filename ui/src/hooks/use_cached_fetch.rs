use retryable::{
    ActiveCache, CacheConfig, CachedFetch, Operation, OperationConfig,
    OperationError, OperationState, TimeSource,
};
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use std::rc::Rc;
use yew::prelude::*;

use crate::contexts::toast::use_toast;
use crate::storage::LocalStorage;
use crate::timer::GlooTimer;

pub struct UseCachedFetchHandle<T, E> {
    /// The cache for the current key.
    pub cache: Rc<CachedFetch<T, E>>,
    /// Cached data, or the last fetched data after an invalidation.
    pub data: Option<T>,
    pub is_stale: bool,
    pub state: OperationState<T, E>,
    /// Fetch, bypassing the cache when given `true`.
    pub fetch: Callback<bool>,
    pub refetch: Callback<()>,
    pub invalidate: Callback<()>,
}

/// Fetch through a `localStorage` cache entry named `cache_<key>`.
///
/// Fetches on mount and whenever `key` changes; a fresh entry (or a stale one
/// with `stale_while_revalidate`) is served without calling `fetch_fn`.
/// Stale entries are never refreshed in the background.
#[hook]
pub fn use_cached_fetch<T, E, F, Fut>(
    key: String,
    config: CacheConfig,
    operation_config: OperationConfig<T, E>,
    fetch_fn: F,
) -> UseCachedFetchHandle<T, E>
where
    T: Clone + Serialize + DeserializeOwned + 'static,
    E: OperationError,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
{
    let toast = use_toast();
    let force_update = use_force_update();

    let cache = {
        let force_update = force_update.clone();
        use_memo(key.clone(), move |key| {
            let operation = Operation::new(
                operation_config,
                Rc::new(toast),
                Rc::new(GlooTimer),
            );
            operation.set_listener(move || force_update.force_update());
            CachedFetch::new(
                key.clone(),
                config,
                operation,
                Rc::new(LocalStorage),
                TimeSource::new(),
                fetch_fn,
            )
        })
    };

    let active = use_memo((), |_| ActiveCache::new());

    // Fetch on mount and key change; the switch cancels the previous key
    {
        let active = active.clone();
        let cache = cache.clone();
        use_effect_with(key, move |_| {
            let fetching = active.activate(cache.clone());
            yew::platform::spawn_local(async move {
                if let Err(e) = fetching.await {
                    tracing::debug!(key = cache.key(), "fetch failed: {e}");
                }
            });
        });
    }

    use_effect_with((), move |_| move || active.deactivate());

    let fetch = {
        let cache = cache.clone();
        Callback::from(move |force: bool| {
            let cache = cache.clone();
            yew::platform::spawn_local(async move {
                let _ = cache.fetch(force).await;
            });
        })
    };

    let refetch = {
        let fetch = fetch.clone();
        Callback::from(move |_| fetch.emit(true))
    };

    let invalidate = {
        let cache = cache.clone();
        Callback::from(move |_| {
            cache.invalidate();
            force_update.force_update();
        })
    };

    let cached = cache.cached();
    UseCachedFetchHandle {
        data: cache.data(),
        is_stale: cached.is_some_and(|c| c.is_stale),
        state: cache.operation().state(),
        cache,
        fetch,
        refetch,
        invalidate,
    }
}
