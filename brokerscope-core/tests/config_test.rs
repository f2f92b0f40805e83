use std::collections::HashMap;
use std::io::Write;

use brokerscope_core::config::{ENV_LOG_STREAM_METRICS_URL, ENV_PUBSUB_ENABLED};
use brokerscope_core::{BrokerKind, ScopeConfig, ScopeError};

#[test]
fn defaults_match_documented_values() {
    let config = ScopeConfig::default();
    assert!(!config.pubsub.enabled);
    assert_eq!(config.cache.ttl_secs, 60);
    assert_eq!(config.history.min_hours, 1);
    assert_eq!(config.history.max_hours, 168);
    assert_eq!(config.history.default_retention_days, 7);
    assert_eq!(config.comparison.baseline, BrokerKind::Amqp);
    assert_eq!(config.pubsub.signal_guard.min_memory_mb, 1.0);
    assert!(config.validate().is_ok());
}

#[test]
fn partial_toml_keeps_defaults_elsewhere() {
    let config = ScopeConfig::from_toml_str(
        r#"
        [pubsub]
        enabled = true
        admin_url = "http://pulsar:8080"

        [comparison]
        challenger = "pubsub"
        measured_only = true
        "#,
    )
    .unwrap();

    assert!(config.pubsub.enabled);
    assert_eq!(config.pubsub.effective_metrics_url(), "http://pulsar:8080/metrics");
    assert_eq!(config.comparison.challenger, BrokerKind::PubSub);
    assert!(config.comparison.measured_only);
    assert_eq!(config.amqp.username, "guest");
}

#[test]
fn malformed_toml_is_a_config_error() {
    let err = ScopeConfig::from_toml_str("[cache\nttl_secs = ").unwrap_err();
    assert!(matches!(err, ScopeError::Config(_)));
}

#[test]
fn validation_rejects_same_baseline_and_challenger() {
    let err = ScopeConfig::from_toml_str(
        r#"
        [comparison]
        baseline = "amqp"
        challenger = "amqp"
        "#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("comparison"));
}

#[test]
fn validation_rejects_zero_ttl() {
    let err = ScopeConfig::from_toml_str("[cache]\nttl_secs = 0\n").unwrap_err();
    assert!(err.to_string().contains("cache.ttl_secs"));
}

#[test]
fn env_overrides_apply() {
    let env: HashMap<&str, &str> = HashMap::from([
        (ENV_PUBSUB_ENABLED, "yes"),
        (ENV_LOG_STREAM_METRICS_URL, " http://jmx:9404/metrics "),
    ]);
    let config = ScopeConfig::default()
        .apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));

    assert!(config.pubsub.enabled);
    assert_eq!(
        config.log_stream.effective_metrics_url(),
        "http://jmx:9404/metrics"
    );
    assert!(config.log_stream.proxy_url.is_none());
}

#[test]
fn env_flag_can_disable_pubsub() {
    let mut base = ScopeConfig::default();
    base.pubsub.enabled = true;
    let config = base.apply_env_overrides(|k| (k == ENV_PUBSUB_ENABLED).then(|| "0".to_string()));
    assert!(!config.pubsub.enabled);
}

#[test]
fn load_reads_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[cache]\nttl_secs = 5").unwrap();
    let config = ScopeConfig::load(file.path()).unwrap();
    assert_eq!(config.cache.ttl_secs, 5);
}

#[test]
fn load_missing_file_names_path() {
    let err = ScopeConfig::load(std::path::Path::new("/nonexistent/brokerscope.toml")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/brokerscope.toml"));
}
