//! HTTP seam shared by every adapter.

pub mod reqwest_transport;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use brokerscope_core::errors::{AdapterError, ScopeResult};

pub use reqwest_transport::ReqwestTransport;

/// Credentials for basic auth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// A GET-only client. Implementations enforce their own per-call timeout.
#[async_trait]
pub trait IHttpTransport: Send + Sync {
    /// Body of a 2xx response.
    async fn get_text(&self, url: &str, auth: Option<&BasicAuth>) -> ScopeResult<String>;

    /// Body of a 2xx response parsed as JSON.
    async fn get_json(&self, url: &str, auth: Option<&BasicAuth>) -> ScopeResult<serde_json::Value> {
        let body = self.get_text(url, auth).await?;
        serde_json::from_str(&body).map_err(|e| decode_err(url, e))
    }
}

/// GET `url` and decode the JSON body into `T`.
pub async fn fetch<T: DeserializeOwned>(
    transport: &dyn IHttpTransport,
    url: &str,
    auth: Option<&BasicAuth>,
) -> ScopeResult<T> {
    let value = transport.get_json(url, auth).await?;
    serde_json::from_value(value).map_err(|e| decode_err(url, e))
}

/// Join a base URL and a path without doubling slashes.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn decode_err(url: &str, e: serde_json::Error) -> brokerscope_core::ScopeError {
    AdapterError::Decode {
        endpoint: url.to_string(),
        reason: e.to_string(),
    }
    .into()
}
