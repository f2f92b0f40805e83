use async_trait::async_trait;

use crate::errors::ScopeResult;
use crate::models::{BrokerKind, BrokerMetricsSample};

/// One broker's "collect a normalized sample" contract.
///
/// Implementations run their own primary→fallback chain and should return a
/// disconnected sample rather than an error when every tier fails. An `Err`
/// is still tolerated: the aggregator maps it to a disconnected sample.
#[async_trait]
pub trait IBrokerCollector: Send + Sync {
    fn kind(&self) -> BrokerKind;

    async fn collect(&self) -> ScopeResult<BrokerMetricsSample>;
}
