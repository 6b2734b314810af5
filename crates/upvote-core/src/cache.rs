//! Single-slot, time-stamped cache of the feature list.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::best_effort::BestEffort;
use crate::clock::{Clock, SystemClock};
use crate::models::Feature;
use crate::store::{get_json, set_json, KeyValueStore, CACHED_FEATURES_KEY};

/// Default freshness window for [`FeatureCache::get_cached`]
pub const DEFAULT_CACHE_MAX_AGE: Duration = Duration::from_secs(5 * 60);

/// Stored form of the cache slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: Vec<Feature>,
    /// Unix milliseconds at which the entry was written
    pub timestamp: i64,
}

/// Feature list snapshot persisted in the durable store
pub struct FeatureCache<S, C = SystemClock> {
    store: Arc<S>,
    clock: C,
}

impl<S, C: Clone> Clone for FeatureCache<S, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: self.clock.clone(),
        }
    }
}

impl<S: KeyValueStore> FeatureCache<S> {
    pub const fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> FeatureCache<S, C> {
    pub const fn with_clock(store: Arc<S>, clock: C) -> Self {
        Self { store, clock }
    }

    /// Return the cached list if it was written less than `max_age` ago.
    ///
    /// An expired, missing, or unreadable entry is a miss (`None`), never an error.
    pub async fn get_cached(&self, max_age: Duration) -> BestEffort<Option<Vec<Feature>>> {
        let result = get_json::<_, CacheEntry>(self.store.as_ref(), CACHED_FEATURES_KEY).await;
        BestEffort::from_result(result, None, "Reading feature cache").map(|entry| {
            let entry = entry?;
            let age = self.clock.now_millis().saturating_sub(entry.timestamp);
            let max_age = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
            if age < max_age {
                Some(entry.data)
            } else {
                tracing::debug!("Feature cache expired ({} ms old)", age);
                None
            }
        })
    }

    /// Overwrite the cache slot with `features`, stamped with the current time.
    pub async fn store(&self, features: &[Feature]) -> BestEffort<()> {
        let entry = CacheEntryRef {
            data: features,
            timestamp: self.clock.now_millis(),
        };
        let result = set_json(self.store.as_ref(), CACHED_FEATURES_KEY, &entry).await;
        BestEffort::from_result(result, (), "Caching features")
    }

    /// Raw stored entry regardless of age.
    pub async fn entry(&self) -> BestEffort<Option<CacheEntry>> {
        let result = get_json(self.store.as_ref(), CACHED_FEATURES_KEY).await;
        BestEffort::from_result(result, None, "Reading feature cache")
    }
}

#[derive(Serialize)]
struct CacheEntryRef<'a> {
    data: &'a [Feature],
    timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::ledger::VoteLedger;
    use crate::models::FeatureId;
    use crate::store::MemoryStore;
    use crate::testing::feature;
    use pretty_assertions::assert_eq;

    const START: i64 = 1_700_000_000_000;

    fn cache() -> (Arc<MemoryStore>, ManualClock, FeatureCache<MemoryStore, ManualClock>) {
        let store = Arc::new(MemoryStore::new());
        let clock = ManualClock::new(START);
        let cache = FeatureCache::with_clock(Arc::clone(&store), clock.clone());
        (store, clock, cache)
    }

    #[tokio::test]
    async fn test_round_trip_within_max_age() {
        let (_, clock, cache) = cache();
        let features = vec![feature(1, "A", 0), feature(2, "B", 4)];

        assert!(!cache.store(&features).await.is_degraded());
        clock.advance(Duration::from_secs(299));

        let cached = cache.get_cached(DEFAULT_CACHE_MAX_AGE).await.into_value();
        assert_eq!(cached, Some(features));
    }

    #[tokio::test]
    async fn test_expires_at_max_age() {
        let (_, clock, cache) = cache();
        let _ = cache.store(&[feature(1, "A", 0)]).await;

        clock.advance(DEFAULT_CACHE_MAX_AGE);
        assert_eq!(cache.get_cached(DEFAULT_CACHE_MAX_AGE).await.into_value(), None);

        // The stale entry is still kept, only reported as a miss
        let entry = cache.entry().await.into_value().unwrap();
        assert_eq!(entry.timestamp, START);
    }

    #[tokio::test]
    async fn test_custom_max_age() {
        let (_, clock, cache) = cache();
        let _ = cache.store(&[feature(1, "A", 0)]).await;
        clock.advance(Duration::from_secs(10 * 60));

        assert_eq!(cache.get_cached(DEFAULT_CACHE_MAX_AGE).await.into_value(), None);
        assert!(cache
            .get_cached(Duration::from_secs(60 * 60))
            .await
            .into_value()
            .is_some());
    }

    #[tokio::test]
    async fn test_empty_list_overwrites_previous_entry() {
        let (_, clock, cache) = cache();
        let _ = cache.store(&[feature(1, "A", 0)]).await;
        clock.advance(Duration::from_secs(1));
        let _ = cache.store(&[]).await;

        assert_eq!(
            cache.get_cached(DEFAULT_CACHE_MAX_AGE).await.into_value(),
            Some(Vec::new())
        );
        assert_eq!(cache.entry().await.into_value().unwrap().timestamp, START + 1_000);
    }

    #[tokio::test]
    async fn test_stored_layout_is_data_and_timestamp() {
        let (store, _, cache) = cache();
        let _ = cache.store(&[feature(1, "A", 0)]).await;

        let raw = store.get(CACHED_FEATURES_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(value["timestamp"], START);
        assert_eq!(value["data"][0]["id"], 1);
        assert_eq!(value["data"][0]["title"], "A");
    }

    #[tokio::test]
    async fn test_store_failures_are_misses() {
        let (store, _, cache) = cache();

        store.set_fail_writes(true);
        assert!(cache.store(&[feature(1, "A", 0)]).await.is_degraded());
        store.set_fail_writes(false);

        let _ = cache.store(&[feature(1, "A", 0)]).await;
        store.set_fail_reads(true);
        let outcome = cache.get_cached(DEFAULT_CACHE_MAX_AGE).await;
        assert!(outcome.is_degraded());
        assert_eq!(outcome.into_value(), None);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let (store, _, cache) = cache();
        store.set(CACHED_FEATURES_KEY, b"{\"data\": 5}").await.unwrap();
        assert_eq!(cache.get_cached(DEFAULT_CACHE_MAX_AGE).await.into_value(), None);
    }

    #[tokio::test]
    async fn test_ledger_is_independent_of_cache_reads() {
        let (store, clock, cache) = cache();
        let ledger = VoteLedger::new(Arc::clone(&store));
        let id = FeatureId::new(1);

        let _ = ledger.add_vote(id).await;
        let _ = cache.store(&[feature(1, "A", 0)]).await;
        let _ = cache.get_cached(DEFAULT_CACHE_MAX_AGE).await;
        clock.advance(Duration::from_secs(3600));
        let _ = cache.get_cached(DEFAULT_CACHE_MAX_AGE).await;

        assert!(ledger.has_voted(id).await.into_value());
        let _ = ledger.remove_vote(id).await;
        let _ = cache.get_cached(DEFAULT_CACHE_MAX_AGE).await;
        assert!(!ledger.has_voted(id).await.into_value());
    }
}
