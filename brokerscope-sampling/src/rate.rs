//! Cumulative counter → approximate per-second rate.

use std::collections::HashMap;

use parking_lot::Mutex;

use brokerscope_core::constants::RATE_EPSILON_SECS;

/// Last observation of one counter. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSnapshot {
    pub last_value: f64,
    pub last_captured_at_millis: i64,
}

/// Per-key snapshot store owned by one adapter instance.
///
/// The first observation of a key yields `None`; every later observation
/// yields a non-negative rate and overwrites the snapshot, even when the
/// counter went backwards, so a reset does not poison later deltas.
#[derive(Debug, Default)]
pub struct RateSampler {
    snapshots: Mutex<HashMap<String, RateSnapshot>>,
}

impl RateSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `cumulative` for `key` at `now_millis` and return the rate since
    /// the previous observation.
    pub fn sample(&self, key: &str, cumulative: f64, now_millis: i64) -> Option<u64> {
        let next = RateSnapshot {
            last_value: cumulative,
            last_captured_at_millis: now_millis,
        };
        let previous = self.snapshots.lock().insert(key.to_string(), next)?;

        let elapsed_secs =
            ((now_millis - previous.last_captured_at_millis) as f64 / 1000.0).max(RATE_EPSILON_SECS);
        let delta = cumulative - previous.last_value;
        let rate = if delta > 0.0 {
            (delta / elapsed_secs).round() as u64
        } else {
            if delta < 0.0 {
                tracing::debug!(key, previous = previous.last_value, cumulative, "counter went backwards");
            }
            0
        };
        Some(rate)
    }

    /// Current snapshot for a key.
    pub fn snapshot(&self, key: &str) -> Option<RateSnapshot> {
        self.snapshots.lock().get(key).copied()
    }

    /// Number of tracked counters.
    pub fn len(&self) -> usize {
        self.snapshots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every snapshot.
    pub fn reset(&self) {
        self.snapshots.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_is_none() {
        let sampler = RateSampler::new();
        assert_eq!(sampler.sample("k", 100.0, 0), None);
        assert_eq!(sampler.len(), 1);
    }

    #[test]
    fn rate_over_two_seconds() {
        let sampler = RateSampler::new();
        sampler.sample("amqp", 100.0, 10_000);
        assert_eq!(sampler.sample("amqp", 300.0, 12_000), Some(100));
    }

    #[test]
    fn counter_reset_floors_to_zero_and_rebases() {
        let sampler = RateSampler::new();
        sampler.sample("k", 1_000.0, 0);
        assert_eq!(sampler.sample("k", 10.0, 1_000), Some(0));
        // The reset value is the new base.
        assert_eq!(sampler.sample("k", 20.0, 2_000), Some(10));
    }

    #[test]
    fn unchanged_counter_is_zero() {
        let sampler = RateSampler::new();
        sampler.sample("k", 5.0, 0);
        assert_eq!(sampler.sample("k", 5.0, 1_000), Some(0));
    }

    #[test]
    fn same_millisecond_uses_epsilon() {
        let sampler = RateSampler::new();
        sampler.sample("k", 0.0, 500);
        // 1 unit over the 1ms floor.
        assert_eq!(sampler.sample("k", 1.0, 500), Some(1_000));
    }

    #[test]
    fn keys_are_independent() {
        let sampler = RateSampler::new();
        sampler.sample("a", 0.0, 0);
        assert_eq!(sampler.sample("b", 50.0, 1_000), None);
        assert_eq!(sampler.sample("a", 50.0, 1_000), Some(50));
    }

    #[test]
    fn reset_forgets_snapshots() {
        let sampler = RateSampler::new();
        sampler.sample("a", 0.0, 0);
        sampler.reset();
        assert!(sampler.is_empty());
        assert_eq!(sampler.sample("a", 10.0, 1_000), None);
    }
}
