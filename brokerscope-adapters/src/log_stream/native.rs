//! [`ILogAdminClient`] over the `kafka` crate. Its client is blocking, so
//! every call runs on the blocking pool with a fresh connection.

use std::collections::HashMap;

use async_trait::async_trait;
use kafka::client::{FetchOffset, KafkaClient};

use brokerscope_core::config::LogStreamConfig;
use brokerscope_core::errors::{AdapterError, ScopeResult};

use super::admin::{ILogAdminClient, TopicInfo};

pub struct KafkaAdminClient {
    hosts: Vec<String>,
    client_id: String,
}

impl KafkaAdminClient {
    pub fn new(config: &LogStreamConfig) -> Self {
        Self {
            hosts: config.bootstrap_servers.clone(),
            client_id: config.client_id.clone(),
        }
    }

    fn connect(hosts: Vec<String>, client_id: String) -> ScopeResult<KafkaClient> {
        let endpoint = hosts.join(",");
        let mut client = KafkaClient::new(hosts);
        client.set_client_id(client_id);
        client
            .load_metadata_all()
            .map_err(|e| AdapterError::ConnectionFailed {
                endpoint,
                reason: e.to_string(),
            })?;
        Ok(client)
    }

    async fn blocking<T, F>(&self, f: F) -> ScopeResult<T>
    where
        T: Send + 'static,
        F: FnOnce(KafkaClient) -> ScopeResult<T> + Send + 'static,
    {
        let hosts = self.hosts.clone();
        let client_id = self.client_id.clone();
        let endpoint = hosts.join(",");
        tokio::task::spawn_blocking(move || f(Self::connect(hosts, client_id)?))
            .await
            .map_err(|e| {
                AdapterError::ConnectionFailed {
                    endpoint,
                    reason: e.to_string(),
                }
            })?
    }
}

#[async_trait]
impl ILogAdminClient for KafkaAdminClient {
    async fn list_topics(&self) -> ScopeResult<Vec<TopicInfo>> {
        self.blocking(|client| {
            Ok(client
                .topics()
                .iter()
                .map(|t| TopicInfo::new(t.name(), t.partitions().len() as u32))
                .collect())
        })
        .await
    }

    async fn high_watermarks(&self, topics: &[String]) -> ScopeResult<HashMap<String, Vec<i64>>> {
        let topics = topics.to_vec();
        let endpoint = self.hosts.join(",");
        self.blocking(move |mut client| {
            let offsets = client
                .fetch_offsets(&topics, FetchOffset::Latest)
                .map_err(|e| AdapterError::ConnectionFailed {
                    endpoint,
                    reason: e.to_string(),
                })?;
            Ok(offsets
                .into_iter()
                .map(|(topic, partitions)| (topic, partitions.into_iter().map(|p| p.offset).collect()))
                .collect())
        })
        .await
    }

    async fn broker_count(&self) -> ScopeResult<Option<u64>> {
        Ok(None)
    }
}
