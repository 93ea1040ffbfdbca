//! Keyed query client with request deduplication and invalidation.
//!
//! Reads go through [`QueryClient::query`]: a fresh cached value is returned
//! as is, otherwise the caller joins the fetch already running for that key
//! or starts one. Writes go through [`QueryClient::mutate`], which marks the
//! declared keys stale only once the write has succeeded.

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::cache::{MemoryCache, QueryCache};
use super::key::QueryKey;
use crate::api::ApiError;

/// Default time a fetched value is served without refetching.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(30);

type SharedFetch = Shared<BoxFuture<'static, Result<Value, ApiError>>>;

struct InFlight {
    id: u64,
    fetch: SharedFetch,
}

#[derive(Default)]
struct Pending {
    fetches: HashMap<QueryKey, InFlight>,
    errors: HashMap<QueryKey, ApiError>,
    next_id: u64,
}

/// What a reader would currently see for a key.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryStatus {
    /// Never fetched, or removed
    Idle,
    /// A fetch is running
    Fetching,
    Fresh,
    /// Cached but past its stale time or invalidated
    Stale,
    /// The last fetch failed and nothing usable is cached
    Failed(ApiError),
}

pub struct QueryClient {
    cache: Arc<dyn QueryCache>,
    pending: Mutex<Pending>,
    stale_time: Duration,
}

impl QueryClient {
    /// Creates a client backed by an in-memory cache.
    pub fn new(stale_time: Duration) -> Self {
        Self::with_cache(Arc::new(MemoryCache::new()), stale_time)
    }

    pub fn with_cache(cache: Arc<dyn QueryCache>, stale_time: Duration) -> Self {
        Self {
            cache,
            pending: Mutex::new(Pending::default()),
            stale_time,
        }
    }

    /// Reads `key`, fetching it at most once no matter how many callers ask
    /// concurrently.
    ///
    /// `fetcher` is only called when there is neither a fresh value nor a
    /// running fetch. A failed fetch is reported to every waiter and is not
    /// cached, so the next call fetches again.
    pub async fn query<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let (id, fetch) = {
            let mut pending = self.lock();

            if let Some(entry) = self.cache.get(&key) {
                if entry.is_fresh(Instant::now()) {
                    return decode(entry.value);
                }
            }

            match pending.fetches.get(&key) {
                Some(in_flight) => {
                    tracing::debug!("Joining in-flight fetch for {}", key);
                    (in_flight.id, in_flight.fetch.clone())
                }
                None => {
                    let id = pending.next_id;
                    pending.next_id += 1;

                    tracing::debug!("Fetching {}", key);
                    let request = fetcher();
                    let fetch = async move {
                        let value = request.await?;
                        serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))
                    }
                    .boxed()
                    .shared();

                    pending.fetches.insert(
                        key.clone(),
                        InFlight {
                            id,
                            fetch: fetch.clone(),
                        },
                    );
                    (id, fetch)
                }
            }
        };

        let result = fetch.await;
        self.settle(&key, id, &result);
        decode(result?)
    }

    /// Runs a write and, once it succeeds, invalidates every key under each
    /// prefix in `invalidates`.
    ///
    /// Mutations are never deduplicated. On failure nothing is invalidated
    /// and the error is returned as is.
    pub async fn mutate<T, F, Fut>(
        &self,
        mutation: F,
        invalidates: &[QueryKey],
    ) -> Result<T, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let value = mutation().await?;
        for prefix in invalidates {
            self.invalidate(prefix);
        }
        Ok(value)
    }

    /// Marks every cached key under `prefix` stale and detaches running
    /// fetches for them.
    ///
    /// A detached fetch still answers its waiters but no longer writes the
    /// cache, so the next `query` starts a new request. Returns the number of
    /// cached entries marked.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut pending = self.lock();
        let before = pending.fetches.len();
        pending.fetches.retain(|key, _| !key.starts_with(prefix));
        let detached = before - pending.fetches.len();
        pending.errors.retain(|key, _| !key.starts_with(prefix));

        let marked = self.cache.invalidate(prefix);
        tracing::debug!(
            "Invalidated {}: {} cached, {} in flight",
            prefix,
            marked,
            detached
        );
        marked
    }

    /// Invalidates `key` and reads it again.
    pub async fn refetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        self.invalidate(&key);
        self.query(key, fetcher).await
    }

    /// Cached value for `key`, fresh or not.
    pub fn get_query_data<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let entry = self.cache.get(key)?;
        serde_json::from_value(entry.value).ok()
    }

    /// Seeds the cache, e.g. with the record a create call returned.
    pub fn set_query_data<T: Serialize>(&self, key: QueryKey, value: &T) -> Result<(), ApiError> {
        let value = serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;
        let mut pending = self.lock();
        pending.errors.remove(&key);
        self.cache.set(key, value, self.stale_time);
        Ok(())
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        let pending = self.lock();
        if pending.fetches.contains_key(key) {
            return QueryStatus::Fetching;
        }
        match self.cache.get(key) {
            Some(entry) if entry.is_fresh(Instant::now()) => QueryStatus::Fresh,
            Some(_) => QueryStatus::Stale,
            None => match pending.errors.get(key) {
                Some(err) => QueryStatus::Failed(err.clone()),
                None => QueryStatus::Idle,
            },
        }
    }

    /// Drops every cached value and forgets running fetches.
    pub fn clear(&self) {
        let mut pending = self.lock();
        pending.fetches.clear();
        pending.errors.clear();
        self.cache.clear();
    }

    fn settle(&self, key: &QueryKey, id: u64, result: &Result<Value, ApiError>) {
        let mut pending = self.lock();
        let owns_slot = pending.fetches.get(key).is_some_and(|f| f.id == id);
        if !owns_slot {
            return;
        }
        pending.fetches.remove(key);

        match result {
            Ok(value) => {
                pending.errors.remove(key);
                self.cache.set(key.clone(), value.clone(), self.stale_time);
            }
            Err(err) => {
                tracing::debug!("Fetch for {} failed: {}", key, err);
                pending.errors.insert(key.clone(), err.clone());
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_TIME)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}
