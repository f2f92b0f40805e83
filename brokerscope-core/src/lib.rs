//! # brokerscope-core
//!
//! Foundation crate for the brokerscope telemetry engine.
//! Defines the normalized sample schema, comparison report types, the seams
//! (collector, store, clock), errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::ScopeConfig;
pub use errors::{ScopeError, ScopeResult};
pub use models::{BrokerKind, BrokerMetricsSample, DataSource, MetricField};
