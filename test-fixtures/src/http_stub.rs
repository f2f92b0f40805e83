//! URL-keyed canned HTTP responses.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use brokerscope_adapters::{BasicAuth, IHttpTransport};
use brokerscope_core::errors::{AdapterError, ScopeResult};

#[derive(Debug, Clone, PartialEq)]
pub enum StubResponse {
    Body(String),
    Status(u16),
    Unreachable,
}

/// Routes can be replaced between calls, so one stub can drive several
/// collection cycles. Unknown URLs are unreachable.
#[derive(Debug, Default)]
pub struct StubTransport {
    routes: Mutex<HashMap<String, StubResponse>>,
    hits: Mutex<HashMap<String, usize>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(&self, url: &str, body: serde_json::Value) -> &Self {
        self.set(url, StubResponse::Body(body.to_string()))
    }

    pub fn text(&self, url: &str, body: &str) -> &Self {
        self.set(url, StubResponse::Body(body.to_string()))
    }

    pub fn status(&self, url: &str, status: u16) -> &Self {
        self.set(url, StubResponse::Status(status))
    }

    pub fn unreachable(&self, url: &str) -> &Self {
        self.set(url, StubResponse::Unreachable)
    }

    pub fn set(&self, url: &str, response: StubResponse) -> &Self {
        self.routes.lock().insert(url.to_string(), response);
        self
    }

    /// Number of requests made to `url`.
    pub fn hits(&self, url: &str) -> usize {
        self.hits.lock().get(url).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().values().sum()
    }
}

#[async_trait]
impl IHttpTransport for StubTransport {
    async fn get_text(&self, url: &str, _auth: Option<&BasicAuth>) -> ScopeResult<String> {
        *self.hits.lock().entry(url.to_string()).or_insert(0) += 1;
        let route = self.routes.lock().get(url).cloned();
        match route {
            Some(StubResponse::Body(body)) => Ok(body),
            Some(StubResponse::Status(status)) => Err(AdapterError::HttpStatus {
                endpoint: url.to_string(),
                status,
            }
            .into()),
            Some(StubResponse::Unreachable) | None => Err(AdapterError::ConnectionFailed {
                endpoint: url.to_string(),
                reason: "connection refused".to_string(),
            }
            .into()),
        }
    }
}
