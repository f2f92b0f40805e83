//! Native admin seam for the log-stream broker.

use std::collections::HashMap;

use async_trait::async_trait;

use brokerscope_core::errors::ScopeResult;

/// One topic as reported by cluster metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicInfo {
    pub name: String,
    pub partitions: u32,
    pub internal: bool,
}

impl TopicInfo {
    pub fn new(name: impl Into<String>, partitions: u32) -> Self {
        Self {
            name: name.into(),
            partitions,
            internal: false,
        }
    }

    /// Flagged internal by the broker, or following the `__` naming convention.
    pub fn is_internal(&self) -> bool {
        self.internal || self.name.starts_with("__")
    }
}

/// Topic listing and high-water offsets over the broker's native protocol.
#[async_trait]
pub trait ILogAdminClient: Send + Sync {
    async fn list_topics(&self) -> ScopeResult<Vec<TopicInfo>>;

    /// Latest offset of every partition, keyed by topic.
    async fn high_watermarks(&self, topics: &[String]) -> ScopeResult<HashMap<String, Vec<i64>>>;

    /// Live broker count, when the protocol exposes it.
    async fn broker_count(&self) -> ScopeResult<Option<u64>>;
}
