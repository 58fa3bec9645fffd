//! Caching layer for provider responses to reduce API calls
//!
//! The dashboard recomputes everything per page interaction; the only state
//! shared between interactions is this TTL-bounded cache. Each tier stores
//! its own value type directly, so a hit hands back the typed data with no
//! serialization in between. The price tier memoizes loads per
//! (ticker, start, end), so reloading a page within a session does not
//! refetch the series.

use cached::{Cached, TimedCache};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::api::{NewsArticle, PriceBar};
use crate::config::DashConfig;

/// Key for one price-history load
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PriceRangeKey {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Key for one news query shape
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NewsQueryKey {
    pub symbol: String,
    pub window_days: Option<i64>,
    pub limit: usize,
}

/// Thread-safe TTL cache for one tier of provider data
pub struct DashCache<K, V> {
    cache: Arc<RwLock<TimedCache<K, V>>>,
}

impl<K, V> DashCache<K, V>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone,
{
    /// Create a new cache with the specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: K, value: V) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Get or fetch a value using the provided fetcher function
    ///
    /// If the value exists in cache, it is returned immediately. Otherwise
    /// the fetcher is called and a successful result is cached. Errors are
    /// never cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: K, fetcher: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!(key = ?key, "Cache hit");
            return Ok(value);
        }

        tracing::debug!(key = ?key, "Cache miss");

        let value = fetcher().await?;
        self.insert(key, value.clone()).await;

        Ok(value)
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<K, V> Clone for DashCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

/// Tiered caches for the three data categories, each with its own value
/// type and TTL
pub struct CacheManager {
    /// Price history per (ticker, start, end)
    pub prices: DashCache<PriceRangeKey, Vec<PriceBar>>,
    /// Fundamentals metric map per symbol
    pub fundamental: DashCache<String, BTreeMap<String, serde_json::Value>>,
    /// News articles per query shape
    pub news: DashCache<NewsQueryKey, Vec<NewsArticle>>,
}

impl CacheManager {
    /// Create a new cache manager with specified TTLs
    pub fn new(prices_ttl: Duration, fundamental_ttl: Duration, news_ttl: Duration) -> Self {
        Self {
            prices: DashCache::new(prices_ttl),
            fundamental: DashCache::new(fundamental_ttl),
            news: DashCache::new(news_ttl),
        }
    }

    /// Create a cache manager from the dashboard configuration
    pub fn from_config(config: &DashConfig) -> Self {
        Self::new(
            config.cache_ttl_prices,
            config.cache_ttl_fundamental,
            config.cache_ttl_news,
        )
    }

    /// Clear all caches
    pub async fn clear_all(&self) {
        self.prices.clear().await;
        self.fundamental.clear().await;
        self.news.clear().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range_key(symbol: &str) -> PriceRangeKey {
        PriceRangeKey {
            symbol: symbol.to_string(),
            start: date(2020, 1, 1),
            end: date(2021, 1, 1),
        }
    }

    fn bar(close: f64) -> PriceBar {
        PriceBar {
            date: date(2020, 6, 1),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    #[tokio::test]
    async fn test_prices_round_trip_typed() {
        let cache: DashCache<PriceRangeKey, Vec<PriceBar>> =
            DashCache::new(Duration::from_secs(60));
        let key = range_key("AAPL");
        let bars = vec![bar(150.0), bar(151.0)];

        cache.insert(key.clone(), bars.clone()).await;

        // A hit returns the typed bars directly
        let retrieved = cache.get(&key).await.unwrap();
        assert_eq!(retrieved.len(), 2);
        assert_eq!(retrieved[0].close, 150.0);
        assert_eq!(retrieved[1].close, 151.0);
    }

    #[tokio::test]
    async fn test_distinct_date_ranges_are_distinct_entries() {
        let cache: DashCache<PriceRangeKey, Vec<PriceBar>> =
            DashCache::new(Duration::from_secs(60));
        let key_2020 = range_key("AAPL");
        let key_2021 = PriceRangeKey {
            start: date(2021, 1, 1),
            end: date(2022, 1, 1),
            ..key_2020.clone()
        };

        cache.insert(key_2020.clone(), vec![bar(150.0)]).await;

        assert!(cache.get(&key_2020).await.is_some());
        assert!(cache.get(&key_2021).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_get_or_fetch() {
        let cache: DashCache<String, BTreeMap<String, serde_json::Value>> =
            DashCache::new(Duration::from_secs(60));
        let mut metrics = BTreeMap::new();
        metrics.insert("peRatio".to_string(), serde_json::json!(27.3));

        let mut call_count = 0;
        let result = cache
            .get_or_fetch("AAPL".to_string(), || {
                call_count += 1;
                let metrics = metrics.clone();
                async move { Ok::<_, String>(metrics) }
            })
            .await
            .unwrap();
        assert_eq!(result, metrics);
        assert_eq!(call_count, 1);

        // Second call should be served from cache
        let result = cache
            .get_or_fetch("AAPL".to_string(), || {
                call_count += 1;
                let metrics = metrics.clone();
                async move { Ok::<_, String>(metrics) }
            })
            .await
            .unwrap();
        assert_eq!(result, metrics);
        assert_eq!(call_count, 1);
    }

    #[tokio::test]
    async fn test_fetch_errors_are_not_cached() {
        let cache: DashCache<NewsQueryKey, Vec<NewsArticle>> =
            DashCache::new(Duration::from_secs(60));
        let key = NewsQueryKey {
            symbol: "AAPL".to_string(),
            window_days: Some(30),
            limit: 5,
        };

        let result = cache
            .get_or_fetch(key.clone(), || async {
                Err::<Vec<NewsArticle>, _>("provider down".to_string())
            })
            .await;
        assert!(result.is_err());
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_manager_tiers_are_independent() {
        let manager = CacheManager::new(
            Duration::from_secs(60),
            Duration::from_secs(60),
            Duration::from_secs(60),
        );
        manager
            .prices
            .insert(range_key("AAPL"), vec![bar(150.0)])
            .await;

        assert_eq!(manager.prices.len().await, 1);
        assert!(manager.fundamental.is_empty().await);
        assert!(manager.news.is_empty().await);

        manager.clear_all().await;
        assert!(manager.prices.is_empty().await);
    }
}
