use std::sync::Arc;

use brokerscope_core::config::ScopeConfig;
use brokerscope_core::models::{BrokerKind, DataSource};
use brokerscope_core::traits::{IBrokerCollector, ManualClock};
use brokerscope_engine::{ComparisonEngine, MetricsAggregator};
use chrono::Utc;

use brokerscope_test_fixtures::{Script, ScriptedCollector, StubTransport};

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(Utc::now().timestamp_millis()))
}

const HEALTHY: Script = Script::Measured {
    rate: 1000.0,
    p99: 5.0,
    memory: 256.0,
};

#[tokio::test]
async fn scenario_e_disabled_pubsub_is_absent() {
    let amqp = ScriptedCollector::new(BrokerKind::Amqp, HEALTHY);
    let log = ScriptedCollector::new(BrokerKind::LogStream, HEALTHY);
    let aggregator = MetricsAggregator::new(amqp, log, None, clock());

    let snapshot = aggregator.collect_all().await;
    assert!(snapshot.pubsub.is_none());

    let json = serde_json::to_value(&snapshot).unwrap();
    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert!(!keys.contains(&"pubsub"));
    assert!(keys.contains(&"amqp") && keys.contains(&"logStream"));

    let report = ComparisonEngine::new(Default::default()).build_report(snapshot, Utc::now());
    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("pubsub").is_none());
}

#[tokio::test]
async fn failures_are_isolated_per_adapter() {
    let amqp = ScriptedCollector::new(BrokerKind::Amqp, Script::Fail);
    let log = ScriptedCollector::new(BrokerKind::LogStream, Script::Panic);
    let pubsub = ScriptedCollector::new(BrokerKind::PubSub, HEALTHY);
    let aggregator = MetricsAggregator::new(
        amqp,
        log,
        Some(pubsub as Arc<dyn IBrokerCollector>),
        clock(),
    );

    let snapshot = aggregator.collect_all().await;
    assert!(snapshot.amqp.is_empty_disconnected());
    assert!(snapshot.log_stream.is_empty_disconnected());
    let pubsub = snapshot.pubsub.unwrap();
    assert!(pubsub.connected);
    assert_eq!(pubsub.data_source, DataSource::Measured);
    assert_eq!(aggregator.counters().snapshot().adapter_failures, 2);
}

#[tokio::test]
async fn adapters_run_concurrently() {
    let delay = std::time::Duration::from_millis(200);
    let amqp = ScriptedCollector::with_delay(BrokerKind::Amqp, HEALTHY, delay);
    let log = ScriptedCollector::with_delay(BrokerKind::LogStream, HEALTHY, delay);
    let pubsub = ScriptedCollector::with_delay(BrokerKind::PubSub, HEALTHY, delay);
    let aggregator = MetricsAggregator::new(
        amqp,
        log,
        Some(pubsub as Arc<dyn IBrokerCollector>),
        clock(),
    );

    let started = std::time::Instant::now();
    aggregator.collect_all().await;
    assert!(started.elapsed() < std::time::Duration::from_millis(550));
}

#[tokio::test]
async fn collect_one_respects_feature_flag() {
    let amqp = ScriptedCollector::new(BrokerKind::Amqp, HEALTHY);
    let log = ScriptedCollector::new(BrokerKind::LogStream, Script::Disconnected);
    let aggregator = MetricsAggregator::new(amqp, log, None, clock());

    assert!(aggregator.collect_one(BrokerKind::PubSub).await.is_none());
    let log = aggregator.collect_one(BrokerKind::LogStream).await.unwrap();
    assert!(!log.connected);
}

#[tokio::test]
async fn from_config_follows_pubsub_flag() {
    let transport = Arc::new(StubTransport::new());
    let mut config = ScopeConfig::default();

    let disabled = MetricsAggregator::from_config(&config, transport.clone(), clock());
    assert!(!disabled.pubsub_enabled());

    config.pubsub.enabled = true;
    let enabled = MetricsAggregator::from_config(&config, transport, clock());
    assert!(enabled.pubsub_enabled());

    let snapshot = enabled.collect_all().await;
    assert!(!snapshot.amqp.connected);
    assert!(!snapshot.pubsub.unwrap().connected);
}
