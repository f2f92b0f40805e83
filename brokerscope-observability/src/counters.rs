//! Lock-free counters for the collection service.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Debug, Default)]
pub struct CollectorCounters {
    cycles: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    adapter_failures: AtomicU64,
    persistence_failures: AtomicU64,
    samples_persisted: AtomicU64,
}

/// Point-in-time copy of [`CollectorCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectorStats {
    pub cycles: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub adapter_failures: u64,
    pub persistence_failures: u64,
    pub samples_persisted: u64,
}

impl CollectorStats {
    /// Share of reads served from cache, `0.0` before the first read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

impl CollectorCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cycle(&self) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_adapter_failure(&self) {
        self.adapter_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_persistence_failure(&self) {
        self.persistence_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_persisted(&self) {
        self.samples_persisted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CollectorStats {
        CollectorStats {
            cycles: self.cycles.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            adapter_failures: self.adapter_failures.load(Ordering::Relaxed),
            persistence_failures: self.persistence_failures.load(Ordering::Relaxed),
            samples_persisted: self.samples_persisted.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.cycles,
            &self.cache_hits,
            &self.cache_misses,
            &self.adapter_failures,
            &self.persistence_failures,
            &self.samples_persisted,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
