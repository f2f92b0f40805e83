use serde::{Deserialize, Serialize};

use super::defaults;

/// Log-stream broker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogStreamConfig {
    /// REST proxy base URL. The proxy is an optional deployment.
    pub proxy_url: Option<String>,
    /// Bootstrap servers for the native admin client.
    pub bootstrap_servers: Vec<String>,
    /// Override for the exposition scrape target.
    pub metrics_url: Option<String>,
    /// Client id announced by the native admin client.
    pub client_id: String,
}

impl LogStreamConfig {
    /// The scrape target: the configured override or the well-known default.
    pub fn effective_metrics_url(&self) -> String {
        self.metrics_url
            .clone()
            .unwrap_or_else(|| defaults::DEFAULT_LOG_STREAM_METRICS_URL.to_string())
    }
}

impl Default for LogStreamConfig {
    fn default() -> Self {
        Self {
            proxy_url: None,
            bootstrap_servers: vec![defaults::DEFAULT_LOG_STREAM_BOOTSTRAP.to_string()],
            metrics_url: None,
            client_id: defaults::DEFAULT_LOG_STREAM_CLIENT_ID.to_string(),
        }
    }
}
