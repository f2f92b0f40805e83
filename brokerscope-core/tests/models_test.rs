use chrono::Utc;

use brokerscope_core::models::*;

fn measured_sample(kind: BrokerKind) -> BrokerMetricsSample {
    let mut s = BrokerMetricsSample::connected(kind, Utc::now());
    s.data_source = DataSource::Measured;
    s.set_metric(MetricField::MessagesPerSecond, 1000.0, DataSource::Measured);
    s.set_metric(MetricField::P99LatencyMs, 12.5, DataSource::Measured);
    s.set_metric(MetricField::MemoryUsageMb, 256.0, DataSource::Measured);
    s
}

#[test]
fn broker_kind_parses_wire_names() {
    for kind in BrokerKind::ALL {
        assert_eq!(kind.as_str().parse::<BrokerKind>().unwrap(), kind);
    }
    assert!("kafka".parse::<BrokerKind>().is_err());
}

#[test]
fn sample_json_roundtrip_preserves_quality_map() {
    let sample = measured_sample(BrokerKind::PubSub);
    let json = serde_json::to_string(&sample).unwrap();
    let back: BrokerMetricsSample = serde_json::from_str(&json).unwrap();
    assert_eq!(back, sample);
}

#[test]
fn snapshot_without_pubsub_has_no_pubsub_key() {
    let snapshot = AggregateSnapshot {
        amqp: measured_sample(BrokerKind::Amqp),
        log_stream: BrokerMetricsSample::disconnected(BrokerKind::LogStream, Utc::now()),
        pubsub: None,
    };
    let json = serde_json::to_value(&snapshot).unwrap();
    assert!(json.get("pubsub").is_none());
    assert!(json.get("logStream").is_some());
    assert_eq!(snapshot.samples().len(), 2);
}

#[test]
fn stamped_snapshot_shares_capture_time() {
    let at = Utc::now();
    let snapshot = AggregateSnapshot {
        amqp: measured_sample(BrokerKind::Amqp),
        log_stream: measured_sample(BrokerKind::LogStream),
        pubsub: Some(measured_sample(BrokerKind::PubSub)),
    }
    .stamped(at);
    let times: Vec<_> = snapshot.samples().iter().map(|s| s.captured_at).collect();
    assert!(times.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn aligned_sample_slots_by_broker() {
    let mut aligned = AlignedSample::new(Utc::now());
    aligned.put(measured_sample(BrokerKind::LogStream));
    assert!(aligned.get(BrokerKind::LogStream).is_some());
    assert!(aligned.get(BrokerKind::Amqp).is_none());
}

#[test]
fn health_from_sample() {
    let healthy = BrokerHealth::from_sample(&measured_sample(BrokerKind::Amqp));
    assert_eq!(healthy.status, HealthStatus::Healthy);

    let mut fallback = measured_sample(BrokerKind::PubSub);
    fallback.data_source = DataSource::Fallback;
    let degraded = BrokerHealth::from_sample(&fallback);
    assert_eq!(degraded.status, HealthStatus::Degraded);
    assert!(degraded.message.unwrap().contains("fallback"));

    let down =
        BrokerHealth::from_sample(&BrokerMetricsSample::disconnected(BrokerKind::Amqp, Utc::now()));
    assert_eq!(down.status, HealthStatus::Unhealthy);
    assert!(!down.connected);
}

proptest::proptest! {
    #[test]
    fn integer_fields_never_go_negative(value in -1e9f64..1e9) {
        let mut s = BrokerMetricsSample::connected(BrokerKind::Amqp, Utc::now());
        s.set_metric(MetricField::MessagesPerSecond, value, DataSource::Fallback);
        s.set_metric(MetricField::ConnectionCount, value, DataSource::Measured);

        let rate = s.messages_per_second.unwrap();
        proptest::prop_assert_eq!(rate, value.max(0.0).round() as u64);
        proptest::prop_assert_eq!(s.quality(MetricField::MessagesPerSecond), DataSource::Fallback);
        proptest::prop_assert_eq!(s.connection_count, s.messages_per_second);
    }

    #[test]
    fn fallback_field_demotes_measured_sample(field_idx in 0usize..3) {
        let mut s = measured_sample(BrokerKind::LogStream);
        let field = MetricField::COMPARED[field_idx];
        s.set_metric(field, 1.0, DataSource::Fallback);
        s.enforce_quality_invariant();
        proptest::prop_assert_eq!(s.data_source, DataSource::Fallback);
    }
}
