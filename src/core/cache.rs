//! In-memory query cache for search results.
//!
//! Entries are keyed by query and carry two windows. While *fresh* they are
//! served without I/O and once *stale* they are refetched on the next
//! request. The backing `moka` cache drops them after the *evict* window, so
//! nothing has to sweep the cache by hand.
//!
//! Each fetch for a key takes a generation number. When two fetches for the
//! same key overlap, only the newest one may write the cache; an older result
//! that arrives late is handed to its caller and otherwise discarded.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::retry::RetryPolicy;
use crate::adapters::{FetchError, SearchParams};
use crate::domain::AssetPage;

/// Upper bound on live entries per policy
pub const MAX_ENTRIES_PER_POLICY: u64 = 1_024;

/// Freshness and eviction windows for one kind of query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CachePolicy {
    /// Served without refetch for this long (seconds)
    pub stale_after_seconds: u64,

    /// Dropped after this long (seconds)
    pub evict_after_seconds: u64,
}

impl CachePolicy {
    /// Video searches: fresh 5 min, evicted after 10 min
    pub fn videos() -> Self {
        Self {
            stale_after_seconds: 5 * 60,
            evict_after_seconds: 10 * 60,
        }
    }

    /// Featured strip: fresh 10 min, evicted after 30 min
    pub fn featured() -> Self {
        Self {
            stale_after_seconds: 10 * 60,
            evict_after_seconds: 30 * 60,
        }
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_seconds)
    }

    pub fn evict_after(&self) -> Duration {
        Duration::from_secs(self.evict_after_seconds)
    }
}

/// Cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// A plain search
    Videos(SearchParams),

    /// The featured strip
    Featured,
}

#[derive(Debug, Clone)]
struct Entry {
    page: Arc<AssetPage>,
    fetched_at: Instant,
    policy: CachePolicy,
}

impl Entry {
    fn new(page: Arc<AssetPage>, policy: CachePolicy) -> Self {
        Self {
            page,
            fetched_at: Instant::now(),
            policy,
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        now.duration_since(self.fetched_at) < self.policy.stale_after()
    }

    fn is_evicted(&self, now: Instant) -> bool {
        now.duration_since(self.fetched_at) >= self.policy.evict_after()
    }
}

/// Query-result cache with bounded retries
pub struct QueryCache {
    /// One store per policy, each with its own time-to-live
    stores: Mutex<HashMap<CachePolicy, Cache<QueryKey, Entry>>>,

    /// Newest generation handed out per key, only while a fetch is in flight
    in_flight: Mutex<HashMap<QueryKey, u64>>,

    next_generation: AtomicU64,
    retry: RetryPolicy,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl QueryCache {
    /// Create an empty cache
    pub fn new(retry: RetryPolicy) -> Self {
        Self {
            stores: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(1),
            retry,
        }
    }

    async fn store_for(&self, policy: CachePolicy) -> Cache<QueryKey, Entry> {
        let mut stores = self.stores.lock().await;
        stores
            .entry(policy)
            .or_insert_with(|| {
                Cache::builder()
                    .max_capacity(MAX_ENTRIES_PER_POLICY)
                    .time_to_live(policy.evict_after())
                    .build()
            })
            .clone()
    }

    async fn all_stores(&self) -> Vec<Cache<QueryKey, Entry>> {
        self.stores.lock().await.values().cloned().collect()
    }

    async fn lookup(&self, key: &QueryKey) -> Option<Entry> {
        let now = Instant::now();
        for store in self.all_stores().await {
            if let Some(entry) = store.get(key).await {
                if !entry.is_evicted(now) {
                    return Some(entry);
                }
                store.invalidate(key).await;
            }
        }
        None
    }

    /// A fresh entry, if any
    pub async fn get_fresh(&self, key: &QueryKey) -> Option<Arc<AssetPage>> {
        let now = Instant::now();
        self.lookup(key)
            .await
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.page)
    }

    /// Any entry that has not been evicted, fresh or stale
    pub async fn peek(&self, key: &QueryKey) -> Option<Arc<AssetPage>> {
        self.lookup(key).await.map(|entry| entry.page)
    }

    /// Store a page directly
    pub async fn insert(&self, key: QueryKey, page: AssetPage, policy: CachePolicy) -> Arc<AssetPage> {
        let page = Arc::new(page);
        self.write(key, Arc::clone(&page), policy).await;
        page
    }

    async fn write(&self, key: QueryKey, page: Arc<AssetPage>, policy: CachePolicy) {
        for store in self.all_stores().await {
            store.invalidate(&key).await;
        }
        self.store_for(policy)
            .await
            .insert(key, Entry::new(page, policy))
            .await;
    }

    /// Drop the entry for a key
    pub async fn invalidate(&self, key: &QueryKey) {
        for store in self.all_stores().await {
            store.invalidate(key).await;
        }
    }

    /// Number of live entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let mut live = 0;
        for store in self.all_stores().await {
            store.run_pending_tasks().await;
            live += store.iter().filter(|(_, entry)| !entry.is_evicted(now)).count();
        }
        live
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Serve a fresh entry or run `fetcher`, retrying per the policy.
    ///
    /// No lock is held while `fetcher` runs.
    pub async fn fetch<F, Fut>(
        &self,
        key: QueryKey,
        policy: CachePolicy,
        fetcher: F,
    ) -> Result<Arc<AssetPage>, FetchError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<AssetPage, FetchError>>,
    {
        if let Some(page) = self.get_fresh(&key).await {
            debug!(?key, "Cache hit");
            return Ok(page);
        }

        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        self.in_flight.lock().await.insert(key.clone(), generation);

        debug!(?key, generation, "Cache miss, fetching");
        let result = self.fetch_with_retry(&key, &fetcher).await;

        let is_latest = {
            let mut in_flight = self.in_flight.lock().await;
            let is_latest = in_flight.get(&key) == Some(&generation);
            if is_latest {
                in_flight.remove(&key);
            }
            is_latest
        };

        let page = Arc::new(result?);
        if is_latest {
            self.write(key, Arc::clone(&page), policy).await;
        } else {
            debug!(?key, generation, "Discarding superseded fetch result");
        }

        Ok(page)
    }

    async fn fetch_with_retry<F, Fut>(&self, key: &QueryKey, fetcher: &F) -> Result<AssetPage, FetchError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<AssetPage, FetchError>>,
    {
        let mut attempt = 1;
        loop {
            match fetcher().await {
                Ok(page) => return Ok(page),
                Err(e) if self.retry.should_retry(attempt) => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    warn!(
                        ?key,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(?key, attempt, error = %e, "Fetch failed permanently");
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MediaAsset;

    fn page(id: &str) -> AssetPage {
        AssetPage::from_assets(vec![MediaAsset::new(id, "")])
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_then_stale_then_evicted() {
        let cache = QueryCache::default();
        let key = QueryKey::Featured;
        cache.insert(key.clone(), page("a"), CachePolicy::videos()).await;

        assert!(cache.get_fresh(&key).await.is_some());

        tokio::time::advance(Duration::from_secs(6 * 60)).await;
        assert!(cache.get_fresh(&key).await.is_none());
        assert!(cache.peek(&key).await.is_some());

        tokio::time::advance(Duration::from_secs(5 * 60)).await;
        assert!(cache.peek(&key).await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = QueryCache::default();
        let key = QueryKey::Videos(SearchParams::default());
        cache.insert(key.clone(), page("a"), CachePolicy::videos()).await;
        assert_eq!(cache.len().await, 1);

        cache.invalidate(&key).await;
        assert!(cache.peek(&key).await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_reinsert_under_other_policy_replaces_entry() {
        let cache = QueryCache::default();
        let key = QueryKey::Featured;
        cache.insert(key.clone(), page("a"), CachePolicy::videos()).await;
        cache.insert(key.clone(), page("b"), CachePolicy::featured()).await;

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.peek(&key).await.unwrap().assets[0].id, "b");
    }

    #[tokio::test]
    async fn test_in_flight_cleared_after_fetch() {
        let cache = QueryCache::new(RetryPolicy::none());
        let key = QueryKey::Featured;

        let _ = cache
            .fetch(key.clone(), CachePolicy::featured(), || async {
                Err::<AssetPage, _>(FetchError::Transport("down".to_string()))
            })
            .await;
        assert!(cache.in_flight.lock().await.is_empty());

        cache
            .fetch(key, CachePolicy::featured(), || async { Ok(page("a")) })
            .await
            .unwrap();
        assert!(cache.in_flight.lock().await.is_empty());
    }

    #[test]
    fn test_policy_windows() {
        assert_eq!(CachePolicy::videos().stale_after(), Duration::from_secs(300));
        assert_eq!(CachePolicy::featured().evict_after(), Duration::from_secs(1800));
    }
}
