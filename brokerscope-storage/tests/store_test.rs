use brokerscope_core::models::{
    millis_to_datetime, BrokerKind, BrokerMetricsSample, DataSource, MetricField,
};
use brokerscope_core::traits::IMetricsStore;
use brokerscope_storage::migrations::LATEST_VERSION;
use brokerscope_storage::SqliteMetricsStore;
use chrono::{Duration, Utc};
use proptest::prelude::*;

fn measured_sample(kind: BrokerKind, at_ms: i64) -> BrokerMetricsSample {
    let mut s = BrokerMetricsSample::connected(kind, millis_to_datetime(at_ms));
    s.set_metric(MetricField::MessagesPerSecond, 1200.0, DataSource::Measured);
    s.set_metric(MetricField::P99LatencyMs, 4.25, DataSource::Measured);
    s.set_metric(MetricField::MemoryUsageMb, 512.5, DataSource::Fallback);
    s.set_metric(MetricField::ConnectionCount, 7.0, DataSource::Measured);
    s.mark_missing(MetricField::CpuPercentage);
    s.uptime = Some("1d 2h 3m 4s".to_string());
    s.partition_count = Some(12);
    s.broker_count = Some(3);
    s.topic_stats
        .insert("orders".to_string(), serde_json::json!({ "partitions": 6 }));
    s.data_source = DataSource::Measured;
    s
}

#[test]
fn sample_round_trips_through_store() {
    let store = SqliteMetricsStore::open_in_memory().unwrap();
    let sample = measured_sample(BrokerKind::LogStream, 1_700_000_000_123);
    let id = store.insert(&sample).unwrap();
    assert!(id > 0);

    let found = store.find_since(millis_to_datetime(0)).unwrap();
    assert_eq!(found, vec![sample]);
}

#[test]
fn disconnected_sample_round_trips() {
    let store = SqliteMetricsStore::open_in_memory().unwrap();
    let sample = BrokerMetricsSample::disconnected(BrokerKind::Amqp, Utc::now());
    store.insert(&sample).unwrap();
    let found = store.find_since(sample.captured_at - Duration::seconds(1)).unwrap();
    assert_eq!(found.len(), 1);
    assert!(found[0].is_empty_disconnected());
    assert_eq!(found[0], sample);
}

#[test]
fn find_since_is_exclusive_and_ordered() {
    let store = SqliteMetricsStore::open_in_memory().unwrap();
    for (kind, at) in [
        (BrokerKind::PubSub, 3_000),
        (BrokerKind::Amqp, 1_000),
        (BrokerKind::LogStream, 2_000),
    ] {
        store.insert(&measured_sample(kind, at)).unwrap();
    }

    let found = store.find_since(millis_to_datetime(1_000)).unwrap();
    let order: Vec<_> = found.iter().map(|s| s.broker_name).collect();
    assert_eq!(order, vec![BrokerKind::LogStream, BrokerKind::PubSub]);
}

#[test]
fn delete_before_prunes_and_is_idempotent() {
    let store = SqliteMetricsStore::open_in_memory().unwrap();
    let now = Utc::now();
    let old = measured_sample(BrokerKind::Amqp, 0).with_captured_at(now - Duration::days(10));
    let fresh = measured_sample(BrokerKind::Amqp, 0).with_captured_at(now);
    store.insert(&old).unwrap();
    store.insert(&fresh).unwrap();

    let cutoff = now - Duration::days(7);
    assert_eq!(store.delete_before(cutoff).unwrap(), 1);
    assert_eq!(store.delete_before(cutoff).unwrap(), 0);
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn file_backed_store_reopens_with_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrics.db");

    {
        let store = SqliteMetricsStore::open(&path, 5000).unwrap();
        store.insert(&measured_sample(BrokerKind::PubSub, 5_000)).unwrap();
        assert_eq!(store.schema_version().unwrap(), LATEST_VERSION);
    }

    let reopened = SqliteMetricsStore::open(&path, 5000).unwrap();
    assert_eq!(reopened.count().unwrap(), 1);
    assert_eq!(reopened.schema_version().unwrap(), LATEST_VERSION);
    assert_eq!(reopened.db_path(), Some(path.as_path()));
}

fn arb_kind() -> impl Strategy<Value = BrokerKind> {
    prop_oneof![
        Just(BrokerKind::Amqp),
        Just(BrokerKind::LogStream),
        Just(BrokerKind::PubSub),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn stored_fields_are_identical(
        kind in arb_kind(),
        at_ms in 0i64..4_000_000_000_000,
        rate in proptest::option::of(0u64..10_000_000),
        p99 in proptest::option::of(0.0f64..10_000.0),
        memory in proptest::option::of(0.0f64..65_536.0),
        connections in proptest::option::of(0u64..100_000),
    ) {
        let store = SqliteMetricsStore::open_in_memory().unwrap();
        let mut sample = BrokerMetricsSample::connected(kind, millis_to_datetime(at_ms));
        sample.messages_per_second = rate;
        sample.p99_latency_ms = p99;
        sample.memory_usage_mb = memory;
        sample.connection_count = connections;
        sample.data_source = DataSource::Fallback;

        store.insert(&sample).unwrap();
        let found = store.find_since(millis_to_datetime(at_ms - 1)).unwrap();
        prop_assert_eq!(found, vec![sample]);
    }
}
