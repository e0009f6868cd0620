//! Caching layer for route lookups.
//!
//! A train's stop sequence is stable within a travel date, and the
//! opportunity search probes the same train repeatedly while walking its
//! later stops. Caching by (train, date) makes those probes cost one
//! route fetch instead of one per probe. Failed lookups are not cached.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache as MokaCache;

use crate::domain::{StopRecord, Telecode};
use crate::transport::Fetch;

use super::client::RouteClient;
use super::error::RouteError;

/// Cache key: (internal train identifier, travel date).
type RouteKey = (String, NaiveDate);

/// Cached stop sequence.
type RouteEntry = Arc<Vec<StopRecord>>;

/// Configuration for the route cache.
#[derive(Debug, Clone)]
pub struct RouteCacheConfig {
    /// TTL for cached routes.
    pub ttl: Duration,

    /// Maximum number of cached routes.
    pub max_capacity: u64,
}

impl Default for RouteCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 512,
        }
    }
}

/// Cache for route API responses.
pub struct RouteCache {
    routes: MokaCache<RouteKey, RouteEntry>,
}

impl RouteCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &RouteCacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { routes }
    }

    /// Get a cached route.
    pub async fn get(&self, key: &RouteKey) -> Option<RouteEntry> {
        self.routes.get(key).await
    }

    /// Insert a route into the cache.
    pub async fn insert(&self, key: RouteKey, entry: RouteEntry) {
        self.routes.insert(key, entry).await;
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.routes.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.routes.invalidate_all();
    }
}

/// Route client with caching.
///
/// Wraps a [`RouteClient`] and caches stop sequences by train and date.
pub struct CachedRouteClient<F> {
    client: RouteClient<F>,
    cache: RouteCache,
}

impl<F: Fetch> CachedRouteClient<F> {
    /// Create a new cached client.
    pub fn new(client: RouteClient<F>, config: &RouteCacheConfig) -> Self {
        Self {
            client,
            cache: RouteCache::new(config),
        }
    }

    /// Fetch the stop sequence for one train run, using the cache if
    /// available.
    pub async fn fetch_route(
        &self,
        train_id: &str,
        start: &Telecode,
        end: &Telecode,
        date: NaiveDate,
    ) -> Result<RouteEntry, RouteError> {
        let key = (train_id.to_string(), date);

        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let stops = self.client.fetch_route(train_id, start, end, date).await?;
        let entry = Arc::new(stops);
        self.cache.insert(key, entry.clone()).await;

        Ok(entry)
    }

    /// Access the underlying client for operations that bypass the cache.
    pub fn client(&self) -> &RouteClient<F> {
        &self.client
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    use crate::route::RouteConfig;
    use crate::transport::FetchError;

    /// Serves queued bodies to `get_text` and counts how many were taken.
    struct CountingFetch {
        bodies: StdMutex<VecDeque<Result<String, FetchError>>>,
        calls: Arc<StdMutex<u32>>,
    }

    impl CountingFetch {
        fn new(bodies: Vec<Result<String, FetchError>>) -> (Self, Arc<StdMutex<u32>>) {
            let calls = Arc::new(StdMutex::new(0));
            (
                Self {
                    bodies: StdMutex::new(bodies.into_iter().collect()),
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    impl Fetch for CountingFetch {
        async fn get_text(&self, url: &str) -> Result<String, FetchError> {
            *self.calls.lock().unwrap() += 1;
            self.bodies.lock().unwrap().pop_front().unwrap_or_else(|| {
                Err(FetchError::Status {
                    status: 500,
                    url: url.to_string(),
                })
            })
        }

        async fn get_page(&self, url: &str) -> Result<String, FetchError> {
            Err(FetchError::Status {
                status: 500,
                url: url.to_string(),
            })
        }
    }

    fn code(s: &str) -> Telecode {
        Telecode::parse(s).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    fn route_body() -> String {
        serde_json::json!({
            "data": {
                "data": [
                    {"station_no": "01", "station_name": "北京南", "start_time": "09:00"},
                    {"station_no": "02", "station_name": "上海虹桥", "start_time": "----"}
                ]
            }
        })
        .to_string()
    }

    fn cached_client(
        bodies: Vec<Result<String, FetchError>>,
    ) -> (CachedRouteClient<CountingFetch>, Arc<StdMutex<u32>>) {
        let (fetch, calls) = CountingFetch::new(bodies);
        let client = RouteClient::new(fetch, RouteConfig::default());
        (
            CachedRouteClient::new(client, &RouteCacheConfig::default()),
            calls,
        )
    }

    #[test]
    fn default_config() {
        let config = RouteCacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(3600));
        assert_eq!(config.max_capacity, 512);
    }

    #[test]
    fn cache_creation() {
        let cache = RouteCache::new(&RouteCacheConfig::default());
        assert_eq!(cache.entry_count(), 0);
    }

    #[tokio::test]
    async fn repeat_lookups_hit_the_cache() {
        let (client, calls) = cached_client(vec![Ok(route_body())]);

        let first = client
            .fetch_route("5l000G101930", &code("VNP"), &code("AOH"), date())
            .await
            .unwrap();
        let second = client
            .fetch_route("5l000G101930", &code("VNP"), &code("AOH"), date())
            .await
            .unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(*calls.lock().unwrap(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn different_dates_are_distinct_entries() {
        let (client, calls) = cached_client(vec![Ok(route_body()), Ok(route_body())]);

        client
            .fetch_route("5l000G101930", &code("VNP"), &code("AOH"), date())
            .await
            .unwrap();
        client
            .fetch_route(
                "5l000G101930",
                &code("VNP"),
                &code("AOH"),
                NaiveDate::from_ymd_opt(2025, 10, 2).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let (client, calls) = cached_client(vec![
            Err(FetchError::Status {
                status: 503,
                url: "route".to_string(),
            }),
            Ok(route_body()),
        ]);

        let first = client
            .fetch_route("5l000G101930", &code("VNP"), &code("AOH"), date())
            .await;
        assert!(first.is_err());

        let second = client
            .fetch_route("5l000G101930", &code("VNP"), &code("AOH"), date())
            .await
            .unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(*calls.lock().unwrap(), 2);
    }
}
