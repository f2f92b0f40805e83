use serde::{Deserialize, Serialize};

use super::defaults;

/// Thresholds a scrape must exceed (on at least one signal) to count as measured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalGuardConfig {
    pub min_throughput: f64,
    pub min_p99_latency_ms: f64,
    pub min_memory_mb: f64,
}

impl Default for SignalGuardConfig {
    fn default() -> Self {
        Self {
            min_throughput: defaults::DEFAULT_GUARD_MIN_THROUGHPUT,
            min_p99_latency_ms: defaults::DEFAULT_GUARD_MIN_P99_LATENCY_MS,
            min_memory_mb: defaults::DEFAULT_GUARD_MIN_MEMORY_MB,
        }
    }
}

/// Pub-sub broker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PubSubConfig {
    /// Feature flag. When off the broker is omitted from aggregate results.
    pub enabled: bool,
    /// Admin REST base URL.
    pub admin_url: String,
    /// Cluster name used for broker listing.
    pub cluster: String,
    /// Exposition endpoint; defaults to `{admin_url}/metrics`.
    pub metrics_url: Option<String>,
    /// Synthesize demo values when every real tier fails.
    pub synthetic_fallback: bool,
    pub signal_guard: SignalGuardConfig,
}

impl PubSubConfig {
    pub fn effective_metrics_url(&self) -> String {
        self.metrics_url
            .clone()
            .unwrap_or_else(|| format!("{}/metrics", self.admin_url.trim_end_matches('/')))
    }
}

impl Default for PubSubConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_PUBSUB_ENABLED,
            admin_url: defaults::DEFAULT_PUBSUB_ADMIN_URL.to_string(),
            cluster: defaults::DEFAULT_PUBSUB_CLUSTER.to_string(),
            metrics_url: None,
            synthetic_fallback: defaults::DEFAULT_SYNTHETIC_FALLBACK,
            signal_guard: SignalGuardConfig::default(),
        }
    }
}
