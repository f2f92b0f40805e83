use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BrokerKind, BrokerMetricsSample};

/// One normalized sample per enabled broker for a single collection cycle.
///
/// `pubsub` is absent (not null) when the pub-sub adapter is disabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSnapshot {
    pub amqp: BrokerMetricsSample,
    pub log_stream: BrokerMetricsSample,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pubsub: Option<BrokerMetricsSample>,
}

impl AggregateSnapshot {
    pub fn get(&self, kind: BrokerKind) -> Option<&BrokerMetricsSample> {
        match kind {
            BrokerKind::Amqp => Some(&self.amqp),
            BrokerKind::LogStream => Some(&self.log_stream),
            BrokerKind::PubSub => self.pubsub.as_ref(),
        }
    }

    /// Present samples in report order.
    pub fn samples(&self) -> Vec<&BrokerMetricsSample> {
        BrokerKind::ALL.iter().filter_map(|k| self.get(*k)).collect()
    }

    /// Stamp every sample with the same capture time.
    pub fn stamped(self, at: DateTime<Utc>) -> Self {
        Self {
            amqp: self.amqp.with_captured_at(at),
            log_stream: self.log_stream.with_captured_at(at),
            pubsub: self.pubsub.map(|s| s.with_captured_at(at)),
        }
    }
}

/// Signed percentage deltas of the challenger relative to the baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonDeltas {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throughput_improvement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_improvement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_efficiency: Option<String>,
}

/// Which brokers' data warrants trust.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualitySummary {
    pub measured_brokers: Vec<BrokerKind>,
    pub fallback_brokers: Vec<BrokerKind>,
    pub missing_brokers: Vec<BrokerKind>,
    pub summary: String,
}

/// Snapshot plus comparison, rebuilt wholesale on every cache miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub timestamp: DateTime<Utc>,
    pub amqp: BrokerMetricsSample,
    pub log_stream: BrokerMetricsSample,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pubsub: Option<BrokerMetricsSample>,
    pub baseline: BrokerKind,
    pub challenger: BrokerKind,
    pub measured_only: bool,
    pub comparison: ComparisonDeltas,
    pub suppressed_reasons: Vec<String>,
    pub data_quality: DataQualitySummary,
}

impl ComparisonReport {
    pub fn sample(&self, kind: BrokerKind) -> Option<&BrokerMetricsSample> {
        match kind {
            BrokerKind::Amqp => Some(&self.amqp),
            BrokerKind::LogStream => Some(&self.log_stream),
            BrokerKind::PubSub => self.pubsub.as_ref(),
        }
    }
}
