//! # brokerscope-engine
//!
//! Fans out to the broker adapters, compares the results, caches the report
//! behind a single-flight gate, persists every sample, and serves aligned
//! history.

pub mod aggregator;
pub mod comparison;
pub mod history;
pub mod service;

pub use aggregator::MetricsAggregator;
pub use comparison::{format_delta, Comparison, ComparisonEngine};
pub use history::{align_by_timestamp, clamp_hours};
pub use service::MetricsService;
