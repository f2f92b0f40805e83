//! # brokerscope-storage
//!
//! Append-only SQLite store for [`BrokerMetricsSample`] rows, keyed by
//! millisecond capture time.
//!
//! [`BrokerMetricsSample`]: brokerscope_core::models::BrokerMetricsSample

pub mod migrations;
pub mod pool;
pub mod queries;
pub mod store;

use brokerscope_core::errors::{ScopeError, StorageError};

pub use store::SqliteMetricsStore;

pub(crate) fn to_storage_err(message: impl Into<String>) -> ScopeError {
    StorageError::Sqlite {
        message: message.into(),
    }
    .into()
}
