use serde::{Deserialize, Serialize};

use super::{BrokerKind, BrokerMetricsSample, DataSource};

/// Coarse status for a broker quick check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Result of a per-broker quick health check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerHealth {
    pub broker: BrokerKind,
    pub status: HealthStatus,
    pub connected: bool,
    pub data_source: DataSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BrokerHealth {
    /// Healthy when connected with measured data, degraded when connected on
    /// fallback or partial data, unhealthy when unreachable.
    pub fn from_sample(sample: &BrokerMetricsSample) -> Self {
        let (status, message) = match (sample.connected, sample.data_source) {
            (false, _) => (
                HealthStatus::Unhealthy,
                Some(format!("{} is unreachable", sample.broker_name)),
            ),
            (true, DataSource::Measured) => (HealthStatus::Healthy, None),
            (true, source) => (
                HealthStatus::Degraded,
                Some(format!("{} is reporting {} data", sample.broker_name, source)),
            ),
        };
        Self {
            broker: sample.broker_name,
            status,
            connected: sample.connected,
            data_source: sample.data_source,
            message,
        }
    }
}
