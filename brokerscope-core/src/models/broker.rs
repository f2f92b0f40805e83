use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ScopeError;

/// The three broker families the engine knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BrokerKind {
    #[serde(rename = "amqp")]
    Amqp,
    #[serde(rename = "log-stream")]
    LogStream,
    #[serde(rename = "pubsub")]
    PubSub,
}

impl BrokerKind {
    /// All kinds in report order.
    pub const ALL: [BrokerKind; 3] = [BrokerKind::Amqp, BrokerKind::LogStream, BrokerKind::PubSub];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amqp => "amqp",
            Self::LogStream => "log-stream",
            Self::PubSub => "pubsub",
        }
    }
}

impl fmt::Display for BrokerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrokerKind {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "amqp" => Ok(Self::Amqp),
            "log-stream" => Ok(Self::LogStream),
            "pubsub" => Ok(Self::PubSub),
            other => Err(ScopeError::UnknownBroker {
                name: other.to_string(),
            }),
        }
    }
}

/// Trust tier of a sample or of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Live, direct read.
    Measured,
    /// Proxy-reported, simulated, or heuristic.
    Fallback,
    /// Unavailable.
    Missing,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Measured => "measured",
            Self::Fallback => "fallback",
            Self::Missing => "missing",
        }
    }

    pub fn is_measured(&self) -> bool {
        matches!(self, Self::Measured)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSource {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "measured" => Ok(Self::Measured),
            "fallback" => Ok(Self::Fallback),
            "missing" => Ok(Self::Missing),
            other => Err(ScopeError::Storage(crate::errors::StorageError::Corrupt {
                details: format!("unknown data source '{other}'"),
            })),
        }
    }
}

/// Fields that carry an individual quality tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricField {
    MessagesPerSecond,
    P50LatencyMs,
    P95LatencyMs,
    P99LatencyMs,
    MemoryUsageMb,
    CpuPercentage,
    ConnectionCount,
}

impl MetricField {
    /// Fields that feed cross-broker comparison.
    pub const COMPARED: [MetricField; 3] = [
        MetricField::MessagesPerSecond,
        MetricField::P99LatencyMs,
        MetricField::MemoryUsageMb,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MessagesPerSecond => "messagesPerSecond",
            Self::P50LatencyMs => "p50LatencyMs",
            Self::P95LatencyMs => "p95LatencyMs",
            Self::P99LatencyMs => "p99LatencyMs",
            Self::MemoryUsageMb => "memoryUsageMb",
            Self::CpuPercentage => "cpuPercentage",
            Self::ConnectionCount => "connectionCount",
        }
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
