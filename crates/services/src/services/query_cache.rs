//! Process-wide read cache.
//!
//! Storage, capacity eviction and in-flight de-duplication are moka's job;
//! this layer adds staleness, the `enabled` gate, retries and prefix
//! invalidation.
//!
//! Invalidation also bumps a per-entity epoch. A load that was already in
//! flight when its entity was invalidated is never kept in the cache, and a
//! caller that arrived after the invalidation refetches instead of sharing it.

use std::{
    any::Any,
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use backon::{ExponentialBuilder, Retryable};
use dashmap::DashMap;
use moka::future::Cache;
use tracing::{debug, warn};

use super::{
    api_error::ApiError,
    query_key::{Entity, QueryKey},
};

pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(30);
pub const DEFAULT_CAPACITY: u64 = 500;

#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// When false the fetcher is never called and the result stays idle.
    pub enabled: bool,
    pub stale_time: Duration,
    /// Extra attempts for transient failures.
    pub retry: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            stale_time: DEFAULT_STALE_TIME,
            retry: 1,
        }
    }
}

impl QueryOptions {
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn retry(mut self, retry: usize) -> Self {
        self.retry = retry;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Success,
    Error,
}

#[derive(Debug)]
pub struct QueryResult<T> {
    pub status: QueryStatus,
    pub data: Option<Arc<T>>,
    pub error: Option<ApiError>,
    /// Served from a fresh cache entry without touching the network.
    pub from_cache: bool,
}

impl<T> Clone for QueryResult<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            from_cache: self.from_cache,
        }
    }
}

impl<T> QueryResult<T> {
    pub fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            from_cache: false,
        }
    }

    pub fn success(data: Arc<T>, from_cache: bool) -> Self {
        Self {
            status: QueryStatus::Success,
            data: Some(data),
            error: None,
            from_cache,
        }
    }

    pub fn error(error: ApiError) -> Self {
        Self {
            status: QueryStatus::Error,
            data: None,
            error: Some(error),
            from_cache: false,
        }
    }

    /// Keeps previously loaded data alongside a newer failure.
    pub fn error_with_data(error: ApiError, data: Option<Arc<T>>) -> Self {
        Self {
            data,
            ..Self::error(error)
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status == QueryStatus::Idle
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_deref()
    }

    /// Idle resolves to `Ok(None)`.
    pub fn into_result(self) -> Result<Option<Arc<T>>, ApiError> {
        match self.error {
            Some(error) if self.status == QueryStatus::Error => Err(error),
            _ => Ok(self.data),
        }
    }
}

/// Invalidation counter observed when a load started. `generation` moves on
/// [`QueryCache::clear`], `epoch` on every invalidation of the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Stamp {
    generation: u64,
    epoch: u64,
}

#[derive(Clone, Default)]
struct Epochs {
    generation: Arc<AtomicU64>,
    by_entity: Arc<DashMap<Entity, u64>>,
}

impl Epochs {
    fn current(&self, entity: Entity) -> Stamp {
        Stamp {
            generation: self.generation.load(Ordering::SeqCst),
            epoch: self.by_entity.get(&entity).map(|e| *e).unwrap_or(0),
        }
    }

    fn bump(&self, entity: Entity) {
        *self.by_entity.entry(entity).or_insert(0) += 1;
    }

    fn bump_all(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Clone)]
pub struct CacheEntry {
    pub key: QueryKey,
    data: Arc<dyn Any + Send + Sync>,
    pub fetched_at: Instant,
    pub stale_time: Duration,
    stamp: Stamp,
}

impl CacheEntry {
    pub fn is_fresh(&self) -> bool {
        self.fetched_at.elapsed() < self.stale_time
    }

    fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.data.clone().downcast::<T>().ok()
    }
}

#[derive(Clone)]
pub struct QueryCache {
    entries: Cache<QueryKey, CacheEntry>,
    epochs: Epochs,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl QueryCache {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(max_capacity).build(),
            epochs: Epochs::default(),
        }
    }

    /// Reads `key`, fetching only when there is no fresh entry.
    ///
    /// Concurrent callers for the same key share a single fetch.
    pub async fn query<T, F, Fut>(&self, key: QueryKey, options: &QueryOptions, fetcher: F) -> QueryResult<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if !options.enabled {
            return QueryResult::idle();
        }

        let observed = self.epochs.current(key.entity);
        if let Some(entry) = self.entries.get(&key).await {
            match entry.downcast::<T>() {
                Some(data) if entry.is_fresh() => {
                    debug!(key = %key, "query cache hit");
                    return QueryResult::success(data, true);
                }
                _ => self.entries.invalidate(&key).await,
            }
        }

        let mut loaded = self.load(&key, options, &fetcher).await;
        if matches!(&loaded, Ok(entry) if entry.stamp < observed) {
            debug!(key = %key, "shared load predates an invalidation, refetching");
            self.entries.invalidate(&key).await;
            loaded = self.load(&key, options, &fetcher).await;
        }

        match loaded {
            Ok(entry) => {
                if entry.stamp != self.epochs.current(key.entity) {
                    debug!(key = %key, "dropping result of a load invalidated mid-flight");
                    self.entries.invalidate(&key).await;
                }
                match entry.downcast::<T>() {
                Some(data) => QueryResult::success(data, false),
                    None => QueryResult::error(ApiError::unknown(format!(
                        "cache entry for {key} holds a different type"
                    ))),
                }
            }
            Err(error) => QueryResult::error((*error).clone()),
        }
    }

    async fn load<T, F, Fut>(
        &self,
        key: &QueryKey,
        options: &QueryOptions,
        fetcher: &F,
    ) -> Result<CacheEntry, Arc<ApiError>>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let epochs = self.epochs.clone();
        let (stale_time, retry) = (options.stale_time, options.retry);
        let entry_key = key.clone();
        self.entries
            .try_get_with(key.clone(), async move {
                let stamp = epochs.current(entry_key.entity);
                debug!(key = %entry_key, "query cache miss, fetching");
                let data = fetch_with_retry(fetcher, retry, &entry_key).await?;
                Ok::<_, ApiError>(CacheEntry {
                    key: entry_key,
                    data: Arc::new(data),
                    fetched_at: Instant::now(),
                    stale_time,
                    stamp,
                })
            })
            .await
    }

    /// Drops every entry whose key starts with `prefix`; the next read refetches.
    pub async fn invalidate(&self, prefix: &QueryKey) -> usize {
        self.epochs.bump(prefix.entity);
        let matching: Vec<QueryKey> = self
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| (*key).clone())
            .collect();

        for key in &matching {
            self.entries.invalidate(key).await;
        }
        debug!(prefix = %prefix, count = matching.len(), "invalidated queries");
        matching.len()
    }

    pub async fn get_data<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        self.entries.get(key).await.and_then(|entry| entry.downcast())
    }

    pub async fn set_data<T: Send + Sync + 'static>(&self, key: QueryKey, data: T, stale_time: Duration) -> Arc<T> {
        let data = Arc::new(data);
        self.entries
            .insert(
                key.clone(),
                CacheEntry {
                    stamp: self.epochs.current(key.entity),
                    key,
                    data: data.clone(),
                    fetched_at: Instant::now(),
                    stale_time,
                },
            )
            .await;
        data
    }

    /// Drops everything, e.g. when the session ends.
    pub fn clear(&self) {
        self.epochs.bump_all();
        self.entries.invalidate_all();
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}

async fn fetch_with_retry<T, F, Fut>(fetcher: &F, retry: usize, key: &QueryKey) -> Result<T, ApiError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    if retry == 0 {
        return fetcher().await;
    }

    (|| fetcher())
        .retry(
            ExponentialBuilder::default()
                .with_min_delay(Duration::from_millis(200))
                .with_max_delay(Duration::from_secs(5))
                .with_max_times(retry)
                .with_jitter(),
        )
        .when(|e: &ApiError| e.should_retry())
        .notify(|e, dur| {
            warn!(
                key = %key,
                "query fetch failed, retrying after {:.2}s: {}",
                dur.as_secs_f64(),
                e
            )
        })
        .await
}
