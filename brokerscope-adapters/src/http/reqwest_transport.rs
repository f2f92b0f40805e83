//! Production transport over `reqwest`.

use std::time::Duration;

use async_trait::async_trait;

use brokerscope_core::config::HttpConfig;
use brokerscope_core::errors::{AdapterError, ScopeResult};

use super::{BasicAuth, IHttpTransport};

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout_ms: u64,
}

impl ReqwestTransport {
    pub fn new(config: &HttpConfig) -> ScopeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .gzip(true)
            .build()
            .map_err(|e| AdapterError::ConnectionFailed {
                endpoint: "http client".to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            timeout_ms: config.timeout_ms,
        })
    }

    fn request_err(&self, url: &str, e: reqwest::Error) -> AdapterError {
        if e.is_timeout() {
            AdapterError::Timeout {
                endpoint: url.to_string(),
                timeout_ms: self.timeout_ms,
            }
        } else {
            AdapterError::ConnectionFailed {
                endpoint: url.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl IHttpTransport for ReqwestTransport {
    async fn get_text(&self, url: &str, auth: Option<&BasicAuth>) -> ScopeResult<String> {
        let mut req = self.client.get(url);
        if let Some(auth) = auth {
            req = req.basic_auth(&auth.username, Some(&auth.password));
        }

        let resp = req.send().await.map_err(|e| self.request_err(url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AdapterError::HttpStatus {
                endpoint: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        resp.text().await.map_err(|e| {
            AdapterError::Decode {
                endpoint: url.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}
