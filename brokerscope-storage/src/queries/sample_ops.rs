//! Insert, range query, prune and count over `broker_metrics`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use brokerscope_core::errors::{ScopeResult, StorageError};
use brokerscope_core::models::{millis_to_datetime, BrokerKind, BrokerMetricsSample, DataSource};

use crate::to_storage_err;

const SELECT_COLUMNS: &str = "broker_name, connected, messages_per_second, p50_latency_ms,
    p95_latency_ms, p99_latency_ms, memory_usage_mb, cpu_percentage, connection_count, uptime,
    partition_count, broker_count, topic_stats, data_source, metric_quality, captured_at_ms";

pub fn insert_sample(conn: &Connection, sample: &BrokerMetricsSample) -> ScopeResult<i64> {
    let topic_stats = serde_json::to_string(&sample.topic_stats)?;
    let metric_quality = serde_json::to_string(&sample.metric_quality)?;

    conn.execute(
        "INSERT INTO broker_metrics (
            broker_name, connected, messages_per_second, p50_latency_ms, p95_latency_ms,
            p99_latency_ms, memory_usage_mb, cpu_percentage, connection_count, uptime,
            partition_count, broker_count, topic_stats, data_source, metric_quality, captured_at_ms
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            sample.broker_name.as_str(),
            sample.connected,
            sample.messages_per_second.map(to_i64),
            sample.p50_latency_ms,
            sample.p95_latency_ms,
            sample.p99_latency_ms,
            sample.memory_usage_mb,
            sample.cpu_percentage,
            sample.connection_count.map(to_i64),
            sample.uptime,
            sample.partition_count.map(to_i64),
            sample.broker_count.map(to_i64),
            topic_stats,
            sample.data_source.as_str(),
            metric_quality,
            sample.captured_at.timestamp_millis(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(conn.last_insert_rowid())
}

/// Rows with `captured_at > after`, oldest first, ties broken by insertion order.
pub fn find_since(conn: &Connection, after: DateTime<Utc>) -> ScopeResult<Vec<BrokerMetricsSample>> {
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM broker_metrics
         WHERE captured_at_ms > ?1
         ORDER BY captured_at_ms ASC, id ASC"
    );
    let mut stmt = conn
        .prepare_cached(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![after.timestamp_millis()], StoredRow::from_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut samples = Vec::new();
    for row in rows {
        let row = row.map_err(|e| to_storage_err(e.to_string()))?;
        samples.push(row.into_sample()?);
    }
    Ok(samples)
}

pub fn delete_before(conn: &Connection, cutoff: DateTime<Utc>) -> ScopeResult<usize> {
    conn.execute(
        "DELETE FROM broker_metrics WHERE captured_at_ms < ?1",
        params![cutoff.timestamp_millis()],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn count(conn: &Connection) -> ScopeResult<usize> {
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM broker_metrics", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(n.max(0) as usize)
}

fn to_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

fn to_u64(v: Option<i64>) -> Option<u64> {
    v.map(|n| n.max(0) as u64)
}

/// Raw column values; enum and JSON decoding happens outside the rusqlite closure.
struct StoredRow {
    broker_name: String,
    connected: bool,
    messages_per_second: Option<i64>,
    p50_latency_ms: Option<f64>,
    p95_latency_ms: Option<f64>,
    p99_latency_ms: Option<f64>,
    memory_usage_mb: Option<f64>,
    cpu_percentage: Option<f64>,
    connection_count: Option<i64>,
    uptime: Option<String>,
    partition_count: Option<i64>,
    broker_count: Option<i64>,
    topic_stats: String,
    data_source: String,
    metric_quality: String,
    captured_at_ms: i64,
}

impl StoredRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            broker_name: row.get(0)?,
            connected: row.get(1)?,
            messages_per_second: row.get(2)?,
            p50_latency_ms: row.get(3)?,
            p95_latency_ms: row.get(4)?,
            p99_latency_ms: row.get(5)?,
            memory_usage_mb: row.get(6)?,
            cpu_percentage: row.get(7)?,
            connection_count: row.get(8)?,
            uptime: row.get(9)?,
            partition_count: row.get(10)?,
            broker_count: row.get(11)?,
            topic_stats: row.get(12)?,
            data_source: row.get(13)?,
            metric_quality: row.get(14)?,
            captured_at_ms: row.get(15)?,
        })
    }

    fn into_sample(self) -> ScopeResult<BrokerMetricsSample> {
        let broker_name: BrokerKind = self.broker_name.parse().map_err(|_| corrupt(&self.broker_name))?;
        let data_source: DataSource = self.data_source.parse()?;
        let topic_stats: BTreeMap<String, serde_json::Value> = serde_json::from_str(&self.topic_stats)?;
        let metric_quality = serde_json::from_str(&self.metric_quality)?;

        Ok(BrokerMetricsSample {
            broker_name,
            connected: self.connected,
            messages_per_second: to_u64(self.messages_per_second),
            p50_latency_ms: self.p50_latency_ms,
            p95_latency_ms: self.p95_latency_ms,
            p99_latency_ms: self.p99_latency_ms,
            memory_usage_mb: self.memory_usage_mb,
            cpu_percentage: self.cpu_percentage,
            connection_count: to_u64(self.connection_count),
            uptime: self.uptime,
            partition_count: to_u64(self.partition_count),
            broker_count: to_u64(self.broker_count),
            topic_stats,
            data_source,
            metric_quality,
            captured_at: millis_to_datetime(self.captured_at_ms),
        })
    }
}

fn corrupt(broker_name: &str) -> StorageError {
    StorageError::Corrupt {
        details: format!("unknown broker name '{broker_name}'"),
    }
}
