//! Built-in pattern chains per broker and signal.
//!
//! Order matters: specific metric names first, generic shapes last.

use std::sync::LazyLock;

use regex::Regex;

use crate::exposition::{Normalizer, PatternChain, SignalPattern, VALUE_PATTERN};

/// Compile a series selector followed by whitespace and the shared sample value group.
fn series_with_value(selector: &str) -> Option<Regex> {
    Regex::new(&format!(r"{selector}[ \t]+{VALUE_PATTERN}")).ok()
}

macro_rules! signal_regex {
    ($name:ident, $selector:expr) => {
        pub static $name: LazyLock<Option<Regex>> = LazyLock::new(|| series_with_value($selector));
    };
}

// ── Latency quantiles ─────────────────────────────────────────────────────
signal_regex!(
    RE_AMQP_CONFIRM_P99,
    r#"(?m)^rabbitmq_publish_confirm_latency_seconds\{[^}]*quantile="0\.99"[^}]*\}"#
);
signal_regex!(
    RE_LOG_PRODUCE_P99_PERCENTILE,
    r#"(?m)^kafka_network_requestmetrics_99thpercentile\{[^}]*request="Produce"[^}]*\}"#
);
signal_regex!(
    RE_LOG_PRODUCE_P99_QUANTILE,
    r#"(?m)^kafka_network_requestmetrics_totaltimems\{(?:[^}]*request="Produce"[^}]*quantile="0\.99"|[^}]*quantile="0\.99"[^}]*request="Produce")[^}]*\}"#
);
signal_regex!(
    RE_PUBSUB_PUBLISH_P99,
    r#"(?m)^pulsar_broker_publish_latency\{[^}]*quantile="0\.99"[^}]*\}"#
);
signal_regex!(
    RE_GENERIC_LATENCY_P99,
    r#"(?m)^[a-zA-Z_:]*latency[a-zA-Z_:]*\{[^}]*quantile="0\.99"[^}]*\}"#
);

// ── Throughput ────────────────────────────────────────────────────────────
signal_regex!(RE_PUBSUB_PUBLISH_RATE, r"(?m)^pulsar_publish_rate(?:\{[^}]*\})?");
signal_regex!(RE_PUBSUB_RATE_IN, r"(?m)^pulsar_rate_in(?:\{[^}]*\})?");

// ── Memory ────────────────────────────────────────────────────────────────
signal_regex!(RE_PROCESS_RESIDENT_MEMORY, r"(?m)^process_resident_memory_bytes(?:\{[^}]*\})?");
signal_regex!(
    RE_JVM_HEAP_USED,
    r#"(?m)^jvm_memory_(?:bytes_used|used_bytes)\{[^}]*area="heap"[^}]*\}"#
);

/// p99 latency for the AMQP broker's exposition endpoint.
pub fn amqp_p99_latency() -> PatternChain {
    PatternChain::new(vec![
        SignalPattern::from_static("amqp_confirm_p99", &RE_AMQP_CONFIRM_P99, Normalizer::SecondsToMs),
        SignalPattern::from_static("generic_latency_p99", &RE_GENERIC_LATENCY_P99, Normalizer::SecondsToMs),
    ])
}

/// p99 produce latency for the log-stream broker. The percentile gauge is
/// already in milliseconds.
pub fn log_stream_p99_latency() -> PatternChain {
    PatternChain::new(vec![
        SignalPattern::from_static(
            "produce_99th_percentile",
            &RE_LOG_PRODUCE_P99_PERCENTILE,
            Normalizer::Identity,
        ),
        SignalPattern::from_static(
            "produce_total_time_p99",
            &RE_LOG_PRODUCE_P99_QUANTILE,
            Normalizer::Identity,
        ),
        SignalPattern::from_static("generic_latency_p99", &RE_GENERIC_LATENCY_P99, Normalizer::SecondsToMs),
    ])
}

/// Publish throughput for the pub-sub broker.
pub fn pubsub_throughput() -> PatternChain {
    PatternChain::new(vec![
        SignalPattern::from_static("publish_rate", &RE_PUBSUB_PUBLISH_RATE, Normalizer::Identity),
        SignalPattern::from_static("rate_in", &RE_PUBSUB_RATE_IN, Normalizer::Identity),
    ])
}

/// p99 publish latency for the pub-sub broker.
pub fn pubsub_p99_latency() -> PatternChain {
    PatternChain::new(vec![
        SignalPattern::from_static("publish_latency_p99", &RE_PUBSUB_PUBLISH_P99, Normalizer::SecondsToMs),
        SignalPattern::from_static("generic_latency_p99", &RE_GENERIC_LATENCY_P99, Normalizer::SecondsToMs),
    ])
}

/// Process or JVM heap memory, in MB.
pub fn memory() -> PatternChain {
    PatternChain::new(vec![
        SignalPattern::from_static("resident_memory", &RE_PROCESS_RESIDENT_MEMORY, Normalizer::BytesToMb),
        SignalPattern::from_static("jvm_heap_used", &RE_JVM_HEAP_USED, Normalizer::BytesToMb),
    ])
}
