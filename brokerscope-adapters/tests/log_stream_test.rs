use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use brokerscope_adapters::log_stream::HIGH_WATERMARKS_KEY;
use brokerscope_adapters::{ILogAdminClient, LogStreamCollector, TopicInfo};
use brokerscope_core::config::LogStreamConfig;
use brokerscope_core::errors::{AdapterError, ScopeError, ScopeResult};
use brokerscope_core::models::{DataSource, MetricField};
use brokerscope_core::traits::{IBrokerCollector, ManualClock};
use brokerscope_test_fixtures::StubTransport;
use serde_json::json;

const PROXY: &str = "http://proxy:8082";
const METRICS: &str = "http://localhost:7071/metrics";

/// Admin double whose offsets can be advanced between cycles.
#[derive(Default)]
struct FakeAdmin {
    topics: Vec<TopicInfo>,
    offsets: Mutex<HashMap<String, Vec<i64>>>,
    down: bool,
    faulty: bool,
}

#[async_trait]
impl ILogAdminClient for FakeAdmin {
    async fn list_topics(&self) -> ScopeResult<Vec<TopicInfo>> {
        if self.down {
            return Err(AdapterError::ConnectionFailed {
                endpoint: "localhost:9092".into(),
                reason: "refused".into(),
            }
            .into());
        }
        if self.faulty {
            return Err(ScopeError::Aggregation {
                reason: "metadata decoder invariant broken".into(),
            });
        }
        Ok(self.topics.clone())
    }

    async fn high_watermarks(&self, topics: &[String]) -> ScopeResult<HashMap<String, Vec<i64>>> {
        let offsets = self.offsets.lock();
        Ok(topics
            .iter()
            .filter_map(|t| offsets.get(t).map(|o| (t.clone(), o.clone())))
            .collect())
    }

    async fn broker_count(&self) -> ScopeResult<Option<u64>> {
        Ok(Some(3))
    }
}

fn admin_with_offsets(orders: Vec<i64>, internal: Vec<i64>) -> Arc<FakeAdmin> {
    let admin = FakeAdmin {
        topics: vec![
            TopicInfo::new("orders", orders.len() as u32),
            TopicInfo::new("__consumer_offsets", internal.len() as u32),
        ],
        ..FakeAdmin::default()
    };
    admin.offsets.lock().insert("orders".into(), orders);
    admin.offsets.lock().insert("__consumer_offsets".into(), internal);
    Arc::new(admin)
}

#[tokio::test]
async fn proxy_aggregates_are_fallback_quality() {
    let transport = Arc::new(StubTransport::new());
    transport
        .json(&format!("{PROXY}/brokers"), json!({ "brokers": [1, 2, 3] }))
        .json(
            &format!("{PROXY}/brokers/1/stats"),
            json!({ "messagesInPerSec": 100.0, "memoryUsedMb": 256.0, "connectionCount": 4 }),
        )
        .json(
            &format!("{PROXY}/brokers/2/stats"),
            json!({ "messagesInPerSec": 50.0, "memoryUsedMb": 128.0, "connectionCount": 2 }),
        )
        .status(&format!("{PROXY}/brokers/3/stats"), 500)
        .json(
            &format!("{PROXY}/topics"),
            json!({ "topics": [
                { "name": "orders", "partitions": 6 },
                { "name": "payments", "partitions": 3 },
                { "name": "_schemas", "partitions": 1, "internal": true },
                { "name": "__consumer_offsets", "partitions": 50 }
            ]}),
        );

    let config = LogStreamConfig {
        proxy_url: Some(PROXY.to_string()),
        ..LogStreamConfig::default()
    };
    let collector = LogStreamCollector::new(config, transport, None, Arc::new(ManualClock::new(0)));
    let sample = collector.collect().await.unwrap();

    assert!(sample.connected);
    assert_eq!(sample.data_source, DataSource::Fallback);
    assert_eq!(sample.messages_per_second, Some(150));
    assert_eq!(sample.memory_usage_mb, Some(384.0));
    assert_eq!(sample.connection_count, Some(6));
    assert_eq!(sample.broker_count, Some(3));
    assert_eq!(sample.partition_count, Some(9));
    assert_eq!(sample.quality(MetricField::MessagesPerSecond), DataSource::Fallback);
    assert_eq!(sample.quality(MetricField::P99LatencyMs), DataSource::Missing);
    assert!(!sample.topic_stats.contains_key("__consumer_offsets"));
}

#[tokio::test]
async fn native_admin_rate_from_high_watermarks() {
    let transport = Arc::new(StubTransport::new());
    transport.text(
        METRICS,
        "kafka_network_requestmetrics_99thpercentile{name=\"TotalTimeMs\",request=\"Produce\"} 6.5\n\
         jvm_memory_bytes_used{area=\"heap\"} 536870912\n",
    );
    let admin = admin_with_offsets(vec![100, 100], vec![9_999]);
    let clock = Arc::new(ManualClock::new(10_000));
    let collector = LogStreamCollector::new(
        LogStreamConfig::default(),
        transport.clone(),
        Some(admin.clone()),
        clock.clone(),
    );

    let first = collector.collect().await.unwrap();
    assert_eq!(first.messages_per_second, None);
    assert_eq!(first.data_source, DataSource::Missing);
    assert_eq!(first.partition_count, Some(2));
    assert_eq!(collector.sampler().snapshot(HIGH_WATERMARKS_KEY).unwrap().last_value, 200.0);

    admin.offsets.lock().insert("orders".into(), vec![400, 300]);
    admin.offsets.lock().insert("__consumer_offsets".into(), vec![99_999]);
    clock.advance(5_000);

    let second = collector.collect().await.unwrap();
    assert_eq!(second.data_source, DataSource::Measured);
    assert_eq!(second.messages_per_second, Some(100));
    assert_eq!(second.p99_latency_ms, Some(6.5));
    assert_eq!(second.memory_usage_mb, Some(512.0));
    assert_eq!(second.broker_count, Some(3));
}

#[tokio::test]
async fn proxy_down_falls_through_to_admin() {
    let transport = Arc::new(StubTransport::new());
    let config = LogStreamConfig {
        proxy_url: Some(PROXY.to_string()),
        ..LogStreamConfig::default()
    };
    let admin = admin_with_offsets(vec![1], vec![]);
    let collector =
        LogStreamCollector::new(config, transport.clone(), Some(admin), Arc::new(ManualClock::new(0)));

    let sample = collector.collect().await.unwrap();
    assert!(sample.connected);
    assert_eq!(transport.hits(&format!("{PROXY}/brokers")), 1);
    assert_eq!(sample.quality(MetricField::P99LatencyMs), DataSource::Missing);
}

#[tokio::test]
async fn neither_path_is_disconnected() {
    let transport = Arc::new(StubTransport::new());
    let admin = Arc::new(FakeAdmin {
        down: true,
        ..FakeAdmin::default()
    });
    let collector = LogStreamCollector::new(
        LogStreamConfig::default(),
        transport,
        Some(admin),
        Arc::new(ManualClock::new(0)),
    );

    let sample = collector.collect().await.unwrap();
    assert!(sample.is_empty_disconnected());
    assert_eq!(sample.data_source, DataSource::Missing);
}

#[test]
fn internal_topics_are_recognized() {
    assert!(TopicInfo::new("__transaction_state", 50).is_internal());
    assert!(!TopicInfo::new("orders", 6).is_internal());
    let flagged = TopicInfo {
        internal: true,
        ..TopicInfo::new("_schemas", 1)
    };
    assert!(flagged.is_internal());
}

#[tokio::test]
async fn non_connection_fault_propagates() {
    let transport = Arc::new(StubTransport::new());
    let admin = Arc::new(FakeAdmin {
        faulty: true,
        ..FakeAdmin::default()
    });
    let config = LogStreamConfig {
        proxy_url: Some(PROXY.to_string()),
        ..LogStreamConfig::default()
    };
    let collector = LogStreamCollector::new(
        config,
        transport.clone(),
        Some(admin as Arc<dyn ILogAdminClient>),
        Arc::new(ManualClock::new(0)),
    );

    let err = collector.collect().await.unwrap_err();
    assert!(!err.is_connection());
    assert_eq!(transport.hits(&format!("{PROXY}/brokers")), 1);
}
