//! Caching module
//!
//! Holds full documentation corpora for providers whose backend has no
//! query endpoint.

use crate::providers::ProviderError;
use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Default time before a cached corpus is fetched again
pub const DEFAULT_STALENESS: Duration = Duration::from_secs(60 * 60);

/// Single-entry cache for a provider's whole corpus.
///
/// The corpus is fetched on first use and again once the staleness window
/// has elapsed since the last successful fetch. Concurrent callers that miss
/// the cache share one fetch. Failed fetches are not cached.
pub struct CorpusCache<T> {
    cache: Cache<(), Arc<T>>,
    staleness: Duration,
}

impl<T: Send + Sync + 'static> CorpusCache<T> {
    /// Create a new corpus cache with the given staleness window
    pub fn new(staleness: Duration) -> Self {
        let cache = Cache::builder()
            .time_to_live(staleness)
            .max_capacity(1)
            .build();

        Self { cache, staleness }
    }

    /// Get the cached corpus, running `fetch` when it is missing or stale
    pub async fn get_or_fetch<F>(&self, fetch: F) -> Result<Arc<T>, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        self.cache
            .try_get_with((), async move { fetch.await.map(Arc::new) })
            .await
            .map_err(|e| (*e).clone())
    }

    /// Drop the cached corpus
    pub async fn invalidate(&self) {
        self.cache.invalidate(&()).await;
    }

    /// Whether a corpus is currently cached
    pub fn is_cached(&self) -> bool {
        self.cache.contains_key(&())
    }

    pub fn staleness(&self) -> Duration {
        self.staleness
    }
}

impl<T: Send + Sync + 'static> Default for CorpusCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_STALENESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_fetches_once_within_window() {
        let cache: CorpusCache<Vec<u32>> = CorpusCache::new(Duration::from_secs(60));
        let fetches = AtomicUsize::new(0);

        for _ in 0..3 {
            let corpus = cache
                .get_or_fetch(async {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![1, 2, 3])
                })
                .await
                .unwrap();
            assert_eq!(*corpus, vec![1, 2, 3]);
        }

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(cache.is_cached());
    }

    #[tokio::test]
    async fn test_refetches_after_window() {
        let cache: CorpusCache<u32> = CorpusCache::new(Duration::from_millis(50));
        let fetches = AtomicUsize::new(0);
        let fetch = || async {
            Ok(fetches.fetch_add(1, Ordering::SeqCst) as u32)
        };

        assert_eq!(*cache.get_or_fetch(fetch()).await.unwrap(), 0);
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(*cache.get_or_fetch(fetch()).await.unwrap(), 1);
        assert_eq!(*cache.get_or_fetch(fetch()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let cache: CorpusCache<u32> = CorpusCache::default();

        let result = cache
            .get_or_fetch(async { Err(ProviderError::Malformed("boom".to_string())) })
            .await;
        assert!(matches!(result, Err(ProviderError::Malformed(_))));
        assert!(!cache.is_cached());

        assert_eq!(*cache.get_or_fetch(async { Ok(7) }).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_fetch() {
        let cache: Arc<CorpusCache<u32>> = Arc::new(CorpusCache::default());
        let fetches = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let fetches = fetches.clone();
                tokio::spawn(async move {
                    cache
                        .get_or_fetch(async move {
                            fetches.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(20)).await;
                            Ok(42)
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(*task.await.unwrap().unwrap(), 42);
        }
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }
}
