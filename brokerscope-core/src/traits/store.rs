use chrono::{DateTime, Utc};

use crate::errors::ScopeResult;
use crate::models::BrokerMetricsSample;

/// Append-only time-series store for broker samples.
pub trait IMetricsStore: Send + Sync {
    /// Append one sample; returns the row id.
    fn insert(&self, sample: &BrokerMetricsSample) -> ScopeResult<i64>;

    /// Samples with `captured_at > after`, oldest first.
    fn find_since(&self, after: DateTime<Utc>) -> ScopeResult<Vec<BrokerMetricsSample>>;

    /// Bulk-delete samples with `captured_at < cutoff`; returns rows removed.
    fn delete_before(&self, cutoff: DateTime<Utc>) -> ScopeResult<usize>;

    /// Total stored samples.
    fn count(&self) -> ScopeResult<usize>;
}
