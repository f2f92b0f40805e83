//! REST proxy payloads.
//!
//! `GET /brokers` → `{"brokers":[1,2]}`,
//! `GET /brokers/{id}/stats` → `{"messagesInPerSec":..,"memoryUsedMb":..,"connectionCount":..}`,
//! `GET /topics` → `{"topics":[{"name":..,"partitions":..,"internal":..}]}`.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct BrokerListing {
    #[serde(default)]
    pub brokers: Vec<serde_json::Value>,
}

impl BrokerListing {
    /// Ids rendered for use in a path; the proxy may return numbers or strings.
    pub fn ids(&self) -> Vec<String> {
        self.brokers
            .iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BrokerStats {
    pub messages_in_per_sec: Option<f64>,
    pub memory_used_mb: Option<f64>,
    pub connection_count: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopicListing {
    #[serde(default)]
    pub topics: Vec<ProxyTopic>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProxyTopic {
    pub name: String,
    #[serde(default)]
    pub partitions: u32,
    #[serde(default)]
    pub internal: bool,
}

/// Running sum that stays `None` until the first value arrives.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Total(Option<f64>);

impl Total {
    pub fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.0 = Some(self.0.unwrap_or(0.0) + v);
        }
    }

    pub fn get(self) -> Option<f64> {
        self.0
    }
}
