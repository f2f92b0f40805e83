use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BrokerKind, BrokerMetricsSample};

/// Queried window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub hours: u32,
}

/// All brokers' samples that share one exact capture timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignedSample {
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amqp: Option<BrokerMetricsSample>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_stream: Option<BrokerMetricsSample>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pubsub: Option<BrokerMetricsSample>,
}

impl AlignedSample {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            amqp: None,
            log_stream: None,
            pubsub: None,
        }
    }

    /// Place a sample in its broker slot; a later row for the same slot wins.
    pub fn put(&mut self, sample: BrokerMetricsSample) {
        match sample.broker_name {
            BrokerKind::Amqp => self.amqp = Some(sample),
            BrokerKind::LogStream => self.log_stream = Some(sample),
            BrokerKind::PubSub => self.pubsub = Some(sample),
        }
    }

    pub fn get(&self, kind: BrokerKind) -> Option<&BrokerMetricsSample> {
        match kind {
            BrokerKind::Amqp => self.amqp.as_ref(),
            BrokerKind::LogStream => self.log_stream.as_ref(),
            BrokerKind::PubSub => self.pubsub.as_ref(),
        }
    }
}

/// Chart-ready history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalMetrics {
    pub time_range: TimeRange,
    pub samples: Vec<AlignedSample>,
}
