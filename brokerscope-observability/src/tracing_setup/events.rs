//! Structured log events for collection milestones.
//!
//! Each function emits a `tracing` event with an `event` field naming it.

use brokerscope_core::models::{BrokerKind, DataSource};

/// One adapter produced a sample.
pub fn sample_collected(broker: BrokerKind, connected: bool, data_source: DataSource) {
    tracing::info!(
        event = "sample_collected",
        broker = %broker,
        connected = connected,
        data_source = %data_source,
        "sample collected"
    );
}

/// An adapter left one tier of its fallback chain for the next.
pub fn tier_fallback(broker: BrokerKind, from: &str, to: &str, reason: &str) {
    tracing::warn!(
        event = "tier_fallback",
        broker = %broker,
        from = %from,
        to = %to,
        reason = %reason,
        "adapter falling back"
    );
}

/// An adapter returned an error or panicked; it is reported disconnected.
pub fn adapter_failed(broker: BrokerKind, error: &str) {
    tracing::warn!(
        event = "adapter_failed",
        broker = %broker,
        error = %error,
        "adapter failed"
    );
}

/// A sample could not be written. The read path continues.
pub fn persistence_failed(broker: BrokerKind, error: &str) {
    tracing::error!(
        event = "persistence_failed",
        broker = %broker,
        error = %error,
        "sample persistence failed"
    );
}

pub fn cache_hit(key: &str) {
    tracing::debug!(event = "cache_hit", key = %key, "cache hit");
}

pub fn cache_miss(key: &str, forced: bool) {
    tracing::debug!(event = "cache_miss", key = %key, forced = forced, "cache miss");
}

/// A comparison delta was withheld.
pub fn comparison_suppressed(reason: &str) {
    tracing::info!(event = "comparison_suppressed", reason = %reason, "comparison suppressed");
}

/// The retention job removed rows.
pub fn retention_pruned(deleted: usize, days_to_keep: u32) {
    tracing::info!(
        event = "retention_pruned",
        deleted = deleted,
        days_to_keep = days_to_keep,
        "old samples pruned"
    );
}
