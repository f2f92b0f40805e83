//! SQL for the broker_metrics table.

pub mod sample_ops;
