//! Cache Gateway Module
//!
//! Admission policy combining the membership filter with the bounded cache.
//!
//! A key moves through three states:
//! - unseen: neither filtered nor cached
//! - seen once: recorded in the filter, served by fetching
//! - repeated: promoted into the cache on its next fetch
//!
//! One-off keys therefore never occupy a cache slot.

use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{BoundedCache, GatewayStats, MembershipFilter};
use crate::error::GatewayError;

// == Resolve Outcome ==
/// Which branch of the admission policy served a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveOutcome {
    /// Value came from the bounded cache; no fetch
    CacheHit,
    /// Key was seen before; value fetched and stored in the cache
    FilterHit,
    /// First sighting; key recorded in the filter, value fetched but not cached
    FilterMiss,
}

impl ResolveOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolveOutcome::CacheHit => "cache_hit",
            ResolveOutcome::FilterHit => "filter_hit",
            ResolveOutcome::FilterMiss => "filter_miss",
        }
    }
}

/// A resolved value together with the branch that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<V> {
    pub value: V,
    pub outcome: ResolveOutcome,
}

enum Decision<V> {
    Hit(V),
    Fetch(ResolveOutcome),
}

// == Cache Gateway ==
/// Two-stage request cache: filter admission in front of an LRU store.
#[derive(Debug)]
pub struct CacheGateway<K, V> {
    filter: MembershipFilter,
    cache: BoundedCache<K, V>,
    stats: GatewayStats,
}

impl<K, V> CacheGateway<K, V>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone,
{
    // == Constructor ==
    /// Creates a gateway with its own filter and cache.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of cached entries, at least 1
    /// * `filter_size` - Number of distinct keys the filter is sized for, at least 1
    /// * `error_rate` - Target false-positive rate of the filter, in (0, 1)
    pub fn new(capacity: usize, filter_size: usize, error_rate: f64) -> Result<Self, GatewayError> {
        let cache = BoundedCache::new(capacity)?;
        let filter = MembershipFilter::new(filter_size, error_rate)?;

        debug!(
            capacity,
            filter_bits = filter.num_bits(),
            filter_hashes = filter.num_hashes(),
            "Cache gateway created"
        );

        Ok(Self {
            filter,
            cache,
            stats: GatewayStats::new(capacity),
        })
    }

    // == Resolve ==
    /// Returns the value for `key`, calling `fetch` only when it is not cached.
    ///
    /// Errors from `fetch` are returned unchanged and never cached.
    pub fn resolve<F, E>(&mut self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce(&K) -> Result<V, E>,
    {
        self.resolve_with_outcome(key, fetch)
            .map(|resolved| resolved.value)
    }

    /// Like [`resolve`](Self::resolve), also reporting which branch was taken.
    pub fn resolve_with_outcome<F, E>(&mut self, key: K, fetch: F) -> Result<Resolved<V>, E>
    where
        F: FnOnce(&K) -> Result<V, E>,
    {
        match self.decide(&key) {
            Decision::Hit(value) => Ok(Resolved {
                value,
                outcome: ResolveOutcome::CacheHit,
            }),
            Decision::Fetch(outcome) => {
                let result = fetch(&key);
                self.complete(key, result, outcome)
            }
        }
    }

    // == Resolve Async ==
    /// Same policy as [`resolve_with_outcome`](Self::resolve_with_outcome)
    /// with an asynchronous fetch.
    ///
    /// The gateway stays mutably borrowed until the fetch finishes, so callers
    /// sharing a gateway serialize every resolve behind one lock.
    pub async fn resolve_async<F, Fut, E>(&mut self, key: K, fetch: F) -> Result<Resolved<V>, E>
    where
        F: FnOnce(K) -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        match self.decide(&key) {
            Decision::Hit(value) => Ok(Resolved {
                value,
                outcome: ResolveOutcome::CacheHit,
            }),
            Decision::Fetch(outcome) => {
                let result = fetch(key.clone()).await;
                self.complete(key, result, outcome)
            }
        }
    }

    /// Checks whether `key` currently holds a cache slot. Does not touch recency.
    pub fn is_cached(&self, key: &K) -> bool {
        self.cache.contains(key)
    }

    /// Checks whether the filter reports `key` as seen before.
    pub fn has_seen(&self, key: &K) -> bool {
        self.filter.might_contain(key)
    }

    /// Cached keys, most recently used first.
    pub fn cached_keys(&self) -> Vec<K> {
        self.cache.keys()
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn capacity(&self) -> usize {
        self.cache.capacity()
    }

    pub fn filter(&self) -> &MembershipFilter {
        &self.filter
    }

    // == Stats ==
    /// Returns current gateway statistics.
    pub fn stats(&self) -> GatewayStats {
        let mut stats = self.stats.clone();
        stats.set_cached_entries(self.cache.len());
        stats
    }

    // Cache first, then filter. A filter miss records the key before any
    // fetch happens and is not undone if that fetch fails.
    fn decide(&mut self, key: &K) -> Decision<V> {
        if self.cache.contains(key) {
            if let Some(value) = self.cache.get(key) {
                let value = value.clone();
                self.stats.record_cache_hit();
                debug!(key = ?key, outcome = "cache_hit", "Served from cache");
                return Decision::Hit(value);
            }
        }

        if self.filter.might_contain(key) {
            self.stats.record_filter_hit();
            self.stats.record_fetch();
            debug!(key = ?key, outcome = "filter_hit", "Key seen before, caching result");
            Decision::Fetch(ResolveOutcome::FilterHit)
        } else {
            self.filter.insert(key);
            self.stats.record_filter_miss();
            self.stats.record_fetch();
            debug!(key = ?key, outcome = "filter_miss", "First sighting, not caching");
            Decision::Fetch(ResolveOutcome::FilterMiss)
        }
    }

    fn complete<E>(
        &mut self,
        key: K,
        result: Result<V, E>,
        outcome: ResolveOutcome,
    ) -> Result<Resolved<V>, E> {
        let value = match result {
            Ok(value) => value,
            Err(err) => {
                self.stats.record_fetch_failure();
                warn!(key = ?key, outcome = outcome.as_str(), "Fetch failed, nothing cached");
                return Err(err);
            }
        };

        if outcome == ResolveOutcome::FilterHit {
            if let Some((evicted, _)) = self.cache.put(key, value.clone()) {
                self.stats.record_eviction();
                debug!(evicted = ?evicted, "Evicted least recently used entry");
            }
            self.stats.set_cached_entries(self.cache.len());
        }

        Ok(Resolved { value, outcome })
    }
}
