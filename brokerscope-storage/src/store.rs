//! [`SqliteMetricsStore`]: owns the write connection and implements [`IMetricsStore`].

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use brokerscope_core::config::StorageConfig;
use brokerscope_core::errors::ScopeResult;
use brokerscope_core::models::BrokerMetricsSample;
use brokerscope_core::traits::IMetricsStore;

use crate::migrations;
use crate::pool::pragmas::verify_wal_mode;
use crate::pool::WriteConnection;
use crate::queries::sample_ops;

pub struct SqliteMetricsStore {
    writer: WriteConnection,
    db_path: Option<PathBuf>,
}

impl SqliteMetricsStore {
    /// Open (creating if needed) a file-backed store.
    pub fn open(path: &Path, busy_timeout_ms: u64) -> ScopeResult<Self> {
        let store = Self {
            writer: WriteConnection::open(path, busy_timeout_ms)?,
            db_path: Some(path.to_path_buf()),
        };
        store.initialize()?;
        Ok(store)
    }

    pub fn from_config(config: &StorageConfig) -> ScopeResult<Self> {
        Self::open(Path::new(&config.db_path), u64::from(config.busy_timeout_ms))
    }

    /// In-memory store (for testing).
    pub fn open_in_memory() -> ScopeResult<Self> {
        let store = Self {
            writer: WriteConnection::open_in_memory()?,
            db_path: None,
        };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> ScopeResult<()> {
        self.writer.with_conn(|conn| {
            let version = migrations::run_migrations(conn)?;
            if self.db_path.is_some() && !verify_wal_mode(conn)? {
                tracing::warn!("broker metrics store is not in WAL mode");
            }
            tracing::debug!(version, path = ?self.db_path, "metrics store ready");
            Ok(())
        })
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub fn schema_version(&self) -> ScopeResult<u32> {
        self.writer.with_conn(migrations::current_version)
    }
}

impl IMetricsStore for SqliteMetricsStore {
    fn insert(&self, sample: &BrokerMetricsSample) -> ScopeResult<i64> {
        self.writer.with_conn(|conn| sample_ops::insert_sample(conn, sample))
    }

    fn find_since(&self, after: DateTime<Utc>) -> ScopeResult<Vec<BrokerMetricsSample>> {
        self.writer.with_conn(|conn| sample_ops::find_since(conn, after))
    }

    fn delete_before(&self, cutoff: DateTime<Utc>) -> ScopeResult<usize> {
        self.writer.with_conn(|conn| sample_ops::delete_before(conn, cutoff))
    }

    fn count(&self) -> ScopeResult<usize> {
        self.writer.with_conn(sample_ops::count)
    }
}
