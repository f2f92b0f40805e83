use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::BrokerKind;

/// Outbound HTTP settings shared by every adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-call timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: defaults::DEFAULT_HTTP_TIMEOUT_MS,
        }
    }
}

/// Comparison report cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: defaults::DEFAULT_CACHE_TTL_SECS,
            max_capacity: defaults::DEFAULT_CACHE_MAX_CAPACITY,
        }
    }
}

/// Which brokers are compared and how strictly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    pub baseline: BrokerKind,
    pub challenger: BrokerKind,
    /// Suppress deltas unless both sides of a field are tagged measured.
    pub measured_only: bool,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            baseline: BrokerKind::Amqp,
            challenger: BrokerKind::LogStream,
            measured_only: defaults::DEFAULT_MEASURED_ONLY,
        }
    }
}

/// History range bounds and retention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub min_hours: u32,
    pub max_hours: u32,
    pub default_retention_days: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            min_hours: defaults::DEFAULT_HISTORY_MIN_HOURS,
            max_hours: defaults::DEFAULT_HISTORY_MAX_HOURS,
            default_retention_days: defaults::DEFAULT_RETENTION_DAYS,
        }
    }
}

/// SQLite store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    pub busy_timeout_ms: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: defaults::DEFAULT_DB_FILENAME.to_string(),
            busy_timeout_ms: defaults::DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::DEFAULT_LOG_LEVEL.to_string(),
            json_logs: defaults::DEFAULT_JSON_LOGS,
        }
    }
}
