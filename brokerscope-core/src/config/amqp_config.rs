use serde::{Deserialize, Serialize};

use super::defaults;

/// AMQP broker control-plane configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AmqpConfig {
    /// Base URL of the management HTTP API.
    pub management_url: String,
    pub username: String,
    pub password: String,
    /// Exposition-format endpoint scraped for latency quantiles. `None` skips the scrape.
    pub metrics_url: Option<String>,
}

impl Default for AmqpConfig {
    fn default() -> Self {
        Self {
            management_url: defaults::DEFAULT_AMQP_MANAGEMENT_URL.to_string(),
            username: defaults::DEFAULT_AMQP_USERNAME.to_string(),
            password: defaults::DEFAULT_AMQP_PASSWORD.to_string(),
            metrics_url: Some(defaults::DEFAULT_AMQP_METRICS_URL.to_string()),
        }
    }
}
