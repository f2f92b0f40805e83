/// Fixed key under which the current comparison report is cached.
pub const CURRENT_METRICS_CACHE_KEY: &str = "broker-metrics:current";

/// Smallest elapsed time (seconds) used when converting counter deltas to rates.
pub const RATE_EPSILON_SECS: f64 = 0.001;

/// Baseline values with a magnitude below this are treated as zero.
pub const NEAR_ZERO: f64 = 1e-9;

/// Exposition values above this are assumed to already be milliseconds.
pub const SECONDS_TO_MS_THRESHOLD: f64 = 10.0;

/// Bytes per megabyte used by every bytes→MB conversion.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
