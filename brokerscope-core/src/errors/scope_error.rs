use super::{AdapterError, ConfigError, StorageError};

/// Top-level error type for the workspace.
#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("aggregation failed: {reason}")]
    Aggregation { reason: String },

    #[error("unknown broker: {name}")]
    UnknownBroker { name: String },
}

impl ScopeError {
    /// True when the failure means "endpoint unreachable or unusable", which
    /// moves an adapter to its next tier instead of aborting.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Adapter(_))
    }

    /// An optional endpoint the deployment does not expose (HTTP 404).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Adapter(e) if e.is_not_found())
    }
}
