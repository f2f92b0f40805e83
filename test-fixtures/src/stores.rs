use chrono::{DateTime, Utc};

use brokerscope_core::errors::{ScopeResult, StorageError};
use brokerscope_core::models::BrokerMetricsSample;
use brokerscope_core::traits::IMetricsStore;

/// A store whose every write fails.
pub struct FailingStore;

impl IMetricsStore for FailingStore {
    fn insert(&self, _sample: &BrokerMetricsSample) -> ScopeResult<i64> {
        Err(StorageError::Sqlite {
            message: "disk I/O error".into(),
        }
        .into())
    }

    fn find_since(&self, _after: DateTime<Utc>) -> ScopeResult<Vec<BrokerMetricsSample>> {
        Ok(Vec::new())
    }

    fn delete_before(&self, _cutoff: DateTime<Utc>) -> ScopeResult<usize> {
        Ok(0)
    }

    fn count(&self) -> ScopeResult<usize> {
        Ok(0)
    }
}
