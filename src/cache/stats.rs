//! Gateway Statistics Module
//!
//! Counts how each lookup was decided so operators can tune capacity,
//! filter size and error rate.

use serde::Serialize;

// == Gateway Stats ==
/// Per-branch counters for the admission policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GatewayStats {
    /// Lookups served from the bounded cache
    pub cache_hits: u64,
    /// Lookups that passed the filter and were promoted into the cache
    pub filter_hits: u64,
    /// Lookups for keys the filter had never seen
    pub filter_misses: u64,
    /// Calls made to the fetch function, counted when the call starts
    pub fetches: u64,
    /// Fetch calls that returned an error
    pub fetch_failures: u64,
    /// Entries evicted due to LRU policy
    pub evictions: u64,
    /// Current number of entries in the cache
    pub cached_entries: usize,
    /// Maximum number of entries in the cache
    pub capacity: usize,
}

impl GatewayStats {
    // == Constructor ==
    /// Creates a new GatewayStats with all counters at zero.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Total number of resolved lookups.
    pub fn lookups(&self) -> u64 {
        self.cache_hits + self.filter_hits + self.filter_misses
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns cache_hits / lookups, or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }

    pub fn record_cache_hit(&mut self) {
        self.cache_hits += 1;
    }

    pub fn record_filter_hit(&mut self) {
        self.filter_hits += 1;
    }

    pub fn record_filter_miss(&mut self) {
        self.filter_misses += 1;
    }

    // == Record Fetch ==
    /// Counts a fetch call as it starts, so abandoned fetches still count.
    pub fn record_fetch(&mut self) {
        self.fetches += 1;
    }

    pub fn record_fetch_failure(&mut self) {
        self.fetch_failures += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn set_cached_entries(&mut self, count: usize) {
        self.cached_entries = count;
    }
}
