//! Broker degradation tracking and alerting.

pub mod alerting;
pub mod tracker;

pub use alerting::{evaluate_alerts, AlertLevel, DegradationAlert};
pub use tracker::{DegradationEvent, DegradationTracker, RecoveryStatus, TrackedDegradation, MAX_TRACKED_EVENTS};
