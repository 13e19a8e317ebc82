use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task;

use crate::cloud::error::CloudError;

/// How long a fetched quota value is served without re-querying the API.
pub(crate) const FRESHNESS_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy)]
pub(crate) struct TrafficTotals {
    pub(crate) included: u64,
    pub(crate) outgoing: u64,
}

pub(crate) trait TrafficProvider: Send + Sync {
    fn traffic_totals(&self, server_id: u64) -> Result<TrafficTotals, CloudError>;
}

/// Everything the collector needs to resolve the traffic quota group.
#[derive(Clone)]
pub(crate) struct TrafficState {
    pub(crate) provider: Arc<dyn TrafficProvider>,
    pub(crate) server_id: u64,
    pub(crate) cache: Arc<TrafficCache>,
}

#[derive(Default)]
struct CacheEntry {
    value: Option<f64>,
    refreshed_at: Option<Instant>,
}

/// Single-entry cache in front of the rate-limited quota lookup. The lock
/// covers check, fetch and update, so concurrent requests serialize on one
/// external call instead of issuing duplicates.
pub(crate) struct TrafficCache {
    window: Duration,
    entry: Mutex<CacheEntry>,
}

impl TrafficCache {
    pub(crate) fn new() -> TrafficCache {
        TrafficCache::with_window(FRESHNESS_WINDOW)
    }

    pub(crate) fn with_window(window: Duration) -> TrafficCache {
        TrafficCache {
            window,
            entry: Mutex::new(CacheEntry::default()),
        }
    }

    /// Returns the percentage of the traffic quota consumed.
    ///
    /// A failed refresh keeps and returns the last known value (`None` if
    /// no lookup ever succeeded); the entry's timestamp is left stale so
    /// the next request past the window retries.
    pub(crate) async fn usage(
        &self,
        provider: &Arc<dyn TrafficProvider>,
        server_id: u64,
    ) -> Option<f64> {
        let mut entry = self.entry.lock().await;

        if let (Some(value), Some(refreshed_at)) = (entry.value, entry.refreshed_at) {
            if refreshed_at.elapsed() < self.window {
                return Some(value);
            }
        }

        let provider = Arc::clone(provider);
        let fetched = task::spawn_blocking(move || provider.traffic_totals(server_id)).await;

        match fetched {
            Ok(Ok(totals)) if totals.included > 0 => {
                let percentage =
                    (totals.outgoing as f64 / totals.included as f64 * 100.0).round();
                entry.value = Some(percentage);
                entry.refreshed_at = Some(Instant::now());
                Some(percentage)
            }
            Ok(Ok(_)) => {
                warn!("Traffic quota reports no included allowance, keeping last known value");
                entry.value
            }
            Ok(Err(err)) => {
                error!("Error getting server data from cloud provider: {}", err);
                entry.value
            }
            Err(err) => {
                error!("Traffic lookup task aborted: {}", err);
                entry.value
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::CountingTraffic;
    use super::*;

    fn provider(fake: CountingTraffic) -> (Arc<CountingTraffic>, Arc<dyn TrafficProvider>) {
        let fake = Arc::new(fake);
        let provider: Arc<dyn TrafficProvider> = fake.clone();
        (fake, provider)
    }

    #[tokio::test]
    async fn fresh_value_is_served_without_a_second_lookup() {
        let (fake, provider) = provider(CountingTraffic::new(100, 40));
        let cache = TrafficCache::new();

        assert_eq!(cache.usage(&provider, 1).await, Some(40.0));
        assert_eq!(cache.usage(&provider, 1).await, Some(40.0));
        assert_eq!(fake.call_count(), 1);
    }

    #[tokio::test]
    async fn stale_value_triggers_a_new_lookup() {
        let (fake, provider) = provider(CountingTraffic::new(100, 40));
        let cache = TrafficCache::with_window(Duration::from_millis(10));

        assert_eq!(cache.usage(&provider, 1).await, Some(40.0));
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.usage(&provider, 1).await, Some(40.0));
        assert_eq!(fake.call_count(), 2);
    }

    #[tokio::test]
    async fn failed_refresh_returns_last_known_value() {
        let (fake, provider) = provider(CountingTraffic {
            included: 100,
            outgoing: 40,
            fail_after: Some(1),
            calls: std::sync::atomic::AtomicUsize::new(0),
        });
        let cache = TrafficCache::with_window(Duration::ZERO);

        assert_eq!(cache.usage(&provider, 1).await, Some(40.0));
        assert_eq!(cache.usage(&provider, 1).await, Some(40.0));
        assert_eq!(fake.call_count(), 2);
    }

    #[tokio::test]
    async fn lookup_failure_without_history_returns_none() {
        let (fake, provider) = provider(CountingTraffic::failing());
        let cache = TrafficCache::new();

        assert_eq!(cache.usage(&provider, 1).await, None);
        assert_eq!(fake.call_count(), 1);
    }

    #[tokio::test]
    async fn zero_included_traffic_is_not_cached() {
        let (fake, provider) = provider(CountingTraffic::new(0, 500));
        let cache = TrafficCache::new();

        assert_eq!(cache.usage(&provider, 1).await, None);
        assert_eq!(cache.usage(&provider, 1).await, None);
        assert_eq!(fake.call_count(), 2);
    }

    #[tokio::test]
    async fn usage_is_rounded_to_the_nearest_integer() {
        let (_fake, provider) = provider(CountingTraffic::new(3, 1));
        let cache = TrafficCache::new();

        // 1/3 of the quota -> 33.33.. -> 33
        assert_eq!(cache.usage(&provider, 1).await, Some(33.0));
    }

    #[tokio::test]
    async fn concurrent_cold_requests_issue_a_single_lookup() {
        let (fake, provider) = provider(CountingTraffic::new(100, 40));
        let cache = Arc::new(TrafficCache::new());

        let mut handles = Vec::new();
        for _ in 0..10 {
            let cache = Arc::clone(&cache);
            let provider = Arc::clone(&provider);
            handles.push(tokio::spawn(async move {
                cache.usage(&provider, 1).await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Some(40.0));
        }
        assert_eq!(fake.call_count(), 1);
    }
}
