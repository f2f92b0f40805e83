//! Configuration surface: per-broker endpoints and credentials, the pub-sub
//! feature flag, the log-stream scrape override, and service tuning.

mod amqp_config;
pub mod defaults;
mod log_stream_config;
mod pubsub_config;
mod service_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use amqp_config::AmqpConfig;
pub use log_stream_config::LogStreamConfig;
pub use pubsub_config::{PubSubConfig, SignalGuardConfig};
pub use service_config::{
    CacheConfig, ComparisonConfig, HistoryConfig, HttpConfig, ObservabilityConfig, StorageConfig,
};

use crate::errors::{ConfigError, ScopeResult};

/// Environment variable toggling the pub-sub adapter.
pub const ENV_PUBSUB_ENABLED: &str = "BROKERSCOPE_PUBSUB_ENABLED";
/// Environment variable overriding the log-stream exposition scrape target.
pub const ENV_LOG_STREAM_METRICS_URL: &str = "BROKERSCOPE_LOG_STREAM_METRICS_URL";
/// Environment variable pointing at the log-stream REST proxy.
pub const ENV_LOG_STREAM_PROXY_URL: &str = "BROKERSCOPE_LOG_STREAM_PROXY_URL";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    pub amqp: AmqpConfig,
    pub log_stream: LogStreamConfig,
    pub pubsub: PubSubConfig,
    pub http: HttpConfig,
    pub cache: CacheConfig,
    pub comparison: ComparisonConfig,
    pub history: HistoryConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl ScopeConfig {
    /// Parse a TOML document. Missing sections fall back to defaults.
    pub fn from_toml_str(raw: &str) -> ScopeResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> ScopeResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&raw)
    }

    /// Apply environment overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.apply_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(flag) = lookup(ENV_PUBSUB_ENABLED) {
            self.pubsub.enabled = is_truthy(&flag);
        }
        if let Some(url) = lookup(ENV_LOG_STREAM_METRICS_URL).filter(|u| !u.trim().is_empty()) {
            self.log_stream.metrics_url = Some(url.trim().to_string());
        }
        if let Some(url) = lookup(ENV_LOG_STREAM_PROXY_URL).filter(|u| !u.trim().is_empty()) {
            self.log_stream.proxy_url = Some(url.trim().to_string());
        }
        self
    }

    /// Reject settings that would make the engine misbehave.
    pub fn validate(&self) -> ScopeResult<()> {
        if self.cache.ttl_secs == 0 {
            return Err(invalid("cache.ttl_secs", "must be greater than zero"));
        }
        if self.http.timeout_ms == 0 {
            return Err(invalid("http.timeout_ms", "must be greater than zero"));
        }
        if self.history.min_hours == 0 || self.history.min_hours > self.history.max_hours {
            return Err(invalid(
                "history",
                "min_hours must be at least 1 and not exceed max_hours",
            ));
        }
        if self.comparison.baseline == self.comparison.challenger {
            return Err(invalid(
                "comparison",
                "baseline and challenger must be different brokers",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> crate::errors::ScopeError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
