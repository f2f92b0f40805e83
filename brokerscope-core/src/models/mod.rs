//! Normalized telemetry schema shared by adapters, storage, and the engine.

mod broker;
mod health;
mod history;
mod report;
mod sample;

pub use broker::{BrokerKind, DataSource, MetricField};
pub use health::{BrokerHealth, HealthStatus};
pub use history::{AlignedSample, HistoricalMetrics, TimeRange};
pub use report::{AggregateSnapshot, ComparisonDeltas, ComparisonReport, DataQualitySummary};
pub use sample::{millis_to_datetime, BrokerMetricsSample};
