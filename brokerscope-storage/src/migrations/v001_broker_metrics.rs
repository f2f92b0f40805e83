//! v001: broker_metrics, one row per broker per collection cycle.

use rusqlite::Connection;

pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS broker_metrics (
            id                   INTEGER PRIMARY KEY AUTOINCREMENT,
            broker_name          TEXT NOT NULL,
            connected            INTEGER NOT NULL,
            messages_per_second  INTEGER,
            p50_latency_ms       REAL,
            p95_latency_ms       REAL,
            p99_latency_ms       REAL,
            memory_usage_mb      REAL,
            cpu_percentage       REAL,
            connection_count     INTEGER,
            uptime               TEXT,
            partition_count      INTEGER,
            broker_count         INTEGER,
            topic_stats          TEXT NOT NULL DEFAULT '{}',
            data_source          TEXT NOT NULL,
            metric_quality       TEXT NOT NULL DEFAULT '{}',
            captured_at_ms       INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_broker_metrics_captured_at
            ON broker_metrics(captured_at_ms);
        ",
    )
}
