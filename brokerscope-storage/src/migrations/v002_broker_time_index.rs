//! v002: per-broker time index for health and per-broker history lookups.

use rusqlite::Connection;

pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_broker_metrics_broker_time
            ON broker_metrics(broker_name, captured_at_ms);",
    )
}
