//! # brokerscope-observability
//!
//! Tracing setup, one structured event per collection milestone, broker
//! degradation tracking with alert evaluation, and lock-free collector
//! counters.

pub mod counters;
pub mod degradation;
pub mod tracing_setup;

pub use counters::{CollectorCounters, CollectorStats};
pub use degradation::{
    evaluate_alerts, AlertLevel, DegradationAlert, DegradationEvent, DegradationTracker,
    RecoveryStatus, TrackedDegradation,
};
pub use tracing_setup::{init_tracing, init_tracing_with_filter};
