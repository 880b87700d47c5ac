//! HTTP backend abstraction for the identity provider.
//!
//! The production implementation uses reqwest and makes exactly one
//! request per call. Tests swap in the fake backend from [`testing`].

use async_trait::async_trait;
use url::Url;

use crate::config::IdentityClientConfig;
use crate::error::{IdentityClientError, IdentityResult};

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Status and decoded body of a provider response.
#[derive(Debug, Clone)]
pub struct JsonResponse {
    pub status: u16,
    /// `None` when the body is empty or not JSON.
    pub body: Option<serde_json::Value>,
}

/// Trait for HTTP backends that can perform an authenticated GET.
///
/// Non-success statuses are returned as data, not as errors; only transport
/// failures are errors.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// GET `url` on behalf of the holder of `bearer`.
    async fn get_json(&self, url: &Url, bearer: &str) -> IdentityResult<JsonResponse>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest. No retries.
pub struct ReqwestBackend {
    client: reqwest::Client,
    api_key: String,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &IdentityClientConfig) -> IdentityResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json(&self, url: &Url, bearer: &str) -> IdentityResult<JsonResponse> {
        let response = self
            .client
            .get(url.as_str())
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    IdentityClientError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    e.into()
                }
            })?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let body = serde_json::from_slice(&bytes).ok();

        Ok(JsonResponse { status, body })
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
