use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BrokerKind, DataSource, MetricField};

/// One broker's normalized statistics for one collection cycle.
///
/// A disconnected sample carries nothing but its broker, `connected=false`,
/// `dataSource=missing`, and the capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerMetricsSample {
    pub broker_name: BrokerKind,
    pub connected: bool,
    /// Absent until the rate sampler has a previous snapshot to diff against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages_per_second: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p50_latency_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p95_latency_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p99_latency_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_usage_mb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<String>,
    /// Log-stream only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_count: Option<u64>,
    /// Log-stream only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker_count: Option<u64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub topic_stats: BTreeMap<String, serde_json::Value>,
    pub data_source: DataSource,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metric_quality: BTreeMap<MetricField, DataSource>,
    pub captured_at: DateTime<Utc>,
}

impl BrokerMetricsSample {
    /// The only constructor for an unreachable broker.
    pub fn disconnected(broker: BrokerKind, captured_at: DateTime<Utc>) -> Self {
        Self {
            broker_name: broker,
            connected: false,
            messages_per_second: None,
            p50_latency_ms: None,
            p95_latency_ms: None,
            p99_latency_ms: None,
            memory_usage_mb: None,
            cpu_percentage: None,
            connection_count: None,
            uptime: None,
            partition_count: None,
            broker_count: None,
            topic_stats: BTreeMap::new(),
            data_source: DataSource::Missing,
            metric_quality: BTreeMap::new(),
            captured_at: truncate_to_millis(captured_at),
        }
    }

    /// An empty connected sample; values are added with [`Self::set_metric`].
    pub fn connected(broker: BrokerKind, captured_at: DateTime<Utc>) -> Self {
        Self {
            connected: true,
            ..Self::disconnected(broker, captured_at)
        }
    }

    /// Write a quality-tagged value. Integer fields are rounded and floored at zero.
    pub fn set_metric(&mut self, field: MetricField, value: f64, quality: DataSource) {
        match field {
            MetricField::MessagesPerSecond => {
                self.messages_per_second = Some(value.max(0.0).round() as u64)
            }
            MetricField::P50LatencyMs => self.p50_latency_ms = Some(value),
            MetricField::P95LatencyMs => self.p95_latency_ms = Some(value),
            MetricField::P99LatencyMs => self.p99_latency_ms = Some(value),
            MetricField::MemoryUsageMb => self.memory_usage_mb = Some(value),
            MetricField::CpuPercentage => self.cpu_percentage = Some(value),
            MetricField::ConnectionCount => {
                self.connection_count = Some(value.max(0.0).round() as u64)
            }
        }
        self.metric_quality.insert(field, quality);
    }

    /// Write an optional value, tagging `missing` when absent.
    pub fn set_metric_opt(&mut self, field: MetricField, value: Option<f64>, quality: DataSource) {
        match value {
            Some(v) => self.set_metric(field, v, quality),
            None => self.mark_missing(field),
        }
    }

    /// Tag a field as unavailable without a value.
    pub fn mark_missing(&mut self, field: MetricField) {
        self.metric_quality.insert(field, DataSource::Missing);
    }

    /// Numeric value of a field, if populated.
    pub fn metric(&self, field: MetricField) -> Option<f64> {
        match field {
            MetricField::MessagesPerSecond => self.messages_per_second.map(|v| v as f64),
            MetricField::P50LatencyMs => self.p50_latency_ms,
            MetricField::P95LatencyMs => self.p95_latency_ms,
            MetricField::P99LatencyMs => self.p99_latency_ms,
            MetricField::MemoryUsageMb => self.memory_usage_mb,
            MetricField::CpuPercentage => self.cpu_percentage,
            MetricField::ConnectionCount => self.connection_count.map(|v| v as f64),
        }
    }

    /// Quality tag of a field; untagged fields count as missing.
    pub fn quality(&self, field: MetricField) -> DataSource {
        self.metric_quality
            .get(&field)
            .copied()
            .unwrap_or(DataSource::Missing)
    }

    /// A sample may only claim `measured` when none of its compared fields is
    /// a fallback value.
    pub fn enforce_quality_invariant(&mut self) {
        if self.data_source == DataSource::Measured
            && MetricField::COMPARED
                .iter()
                .any(|f| self.metric_quality.get(f) == Some(&DataSource::Fallback))
        {
            self.data_source = DataSource::Fallback;
        }
    }

    /// Re-stamp the capture time (millisecond precision).
    pub fn with_captured_at(mut self, at: DateTime<Utc>) -> Self {
        self.captured_at = truncate_to_millis(at);
        self
    }

    /// True when a disconnected sample carries no data beyond its identity.
    pub fn is_empty_disconnected(&self) -> bool {
        !self.connected
            && self.messages_per_second.is_none()
            && self.p50_latency_ms.is_none()
            && self.p95_latency_ms.is_none()
            && self.p99_latency_ms.is_none()
            && self.memory_usage_mb.is_none()
            && self.cpu_percentage.is_none()
            && self.connection_count.is_none()
            && self.uptime.is_none()
            && self.partition_count.is_none()
            && self.broker_count.is_none()
            && self.topic_stats.is_empty()
            && self.metric_quality.is_empty()
    }
}

/// Convert epoch milliseconds to a UTC timestamp.
pub fn millis_to_datetime(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

fn truncate_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    millis_to_datetime(at.timestamp_millis())
}
