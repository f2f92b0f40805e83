//! Span definitions for a collection cycle and a single adapter call.

/// Span around one aggregation cycle.
#[macro_export]
macro_rules! collection_span {
    ($forced:expr) => {
        tracing::info_span!("brokerscope.collection", forced = $forced)
    };
}

/// Span around one adapter's `collect()`.
#[macro_export]
macro_rules! adapter_span {
    ($broker:expr) => {
        tracing::info_span!("brokerscope.adapter", broker = %$broker)
    };
}
