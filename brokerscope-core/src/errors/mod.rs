//! Error taxonomy.
//!
//! Adapter failures trigger fallback tiers, storage failures are logged and
//! swallowed on the read path, config failures surface at startup.

mod adapter_error;
mod config_error;
mod scope_error;
mod storage_error;

pub use adapter_error::AdapterError;
pub use config_error::ConfigError;
pub use scope_error::ScopeError;
pub use storage_error::StorageError;

/// Convenience alias used across the workspace.
pub type ScopeResult<T> = Result<T, ScopeError>;
