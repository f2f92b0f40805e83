/// Broker control-plane errors. Every variant is recoverable by the adapter's
/// next fallback tier.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("connection to {endpoint} failed: {reason}")]
    ConnectionFailed { endpoint: String, reason: String },

    #[error("{endpoint} returned HTTP {status}")]
    HttpStatus { endpoint: String, status: u16 },

    #[error("could not decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("request to {endpoint} timed out after {timeout_ms}ms")]
    Timeout { endpoint: String, timeout_ms: u64 },

    #[error("no measured signal in {source_name}")]
    NoSignal { source_name: String },
}

impl AdapterError {
    /// HTTP 404 from an optional endpoint (e.g. a per-broker stats route that
    /// the deployment does not expose).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::HttpStatus { status: 404, .. })
    }
}
