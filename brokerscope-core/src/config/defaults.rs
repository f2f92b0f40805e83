// Single source of truth for all default values.

// --- AMQP broker ---
pub const DEFAULT_AMQP_MANAGEMENT_URL: &str = "http://localhost:15672";
pub const DEFAULT_AMQP_USERNAME: &str = "guest";
pub const DEFAULT_AMQP_PASSWORD: &str = "guest";
pub const DEFAULT_AMQP_METRICS_URL: &str = "http://localhost:15692/metrics";

// --- Log-stream broker ---
pub const DEFAULT_LOG_STREAM_BOOTSTRAP: &str = "localhost:9092";
pub const DEFAULT_LOG_STREAM_METRICS_URL: &str = "http://localhost:7071/metrics";
pub const DEFAULT_LOG_STREAM_CLIENT_ID: &str = "brokerscope";

// --- Pub-sub broker ---
pub const DEFAULT_PUBSUB_ENABLED: bool = false;
pub const DEFAULT_PUBSUB_ADMIN_URL: &str = "http://localhost:8080";
pub const DEFAULT_PUBSUB_CLUSTER: &str = "standalone";
pub const DEFAULT_SYNTHETIC_FALLBACK: bool = true;
pub const DEFAULT_GUARD_MIN_THROUGHPUT: f64 = 0.0;
pub const DEFAULT_GUARD_MIN_P99_LATENCY_MS: f64 = 0.0;
pub const DEFAULT_GUARD_MIN_MEMORY_MB: f64 = 1.0;

// --- HTTP ---
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 3_000;

// --- Cache ---
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;
pub const DEFAULT_CACHE_MAX_CAPACITY: u64 = 16;

// --- Comparison ---
pub const DEFAULT_MEASURED_ONLY: bool = false;

// --- History ---
pub const DEFAULT_HISTORY_MIN_HOURS: u32 = 1;
pub const DEFAULT_HISTORY_MAX_HOURS: u32 = 168; // 7 days
pub const DEFAULT_RETENTION_DAYS: u32 = 7;

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "brokerscope.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
