//! HTTP client for the VoguePay command API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;

use crate::domain::gateway::{GatewayError, OutboundRequest};
use crate::ports::PaymentProcessor;

/// Production command API endpoint.
pub const DEFAULT_API_URL: &str = "https://voguepay.com/api/";

/// Redirects followed before giving up.
const MAX_REDIRECTS: usize = 2;

/// Command API client configuration.
#[derive(Debug, Clone)]
pub struct VoguePayConfig {
    api_url: String,
    timeout: Duration,
}

impl VoguePayConfig {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_url: api_url.into(),
            timeout,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for VoguePayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, Duration::from_secs(30))
    }
}

/// Posts signed requests to the command API.
///
/// Implements `PaymentProcessor`; the body is returned untouched so the
/// caller can strip the prefix and verify the hash.
pub struct VoguePayClient {
    config: VoguePayConfig,
    http_client: reqwest::Client,
}

impl VoguePayClient {
    /// # Errors
    ///
    /// `GatewayError::Configuration` if the HTTP client cannot be built.
    pub fn new(config: VoguePayConfig) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &VoguePayConfig {
        &self.config
    }
}

#[async_trait]
impl PaymentProcessor for VoguePayClient {
    async fn submit(&self, request: &OutboundRequest) -> Result<Vec<u8>, GatewayError> {
        let json = request
            .to_json()
            .map_err(|e| GatewayError::Configuration(format!("request encoding: {}", e)))?;

        let response = self
            .http_client
            .post(&self.config.api_url)
            .form(&[("json", json)])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    operation = %request.operation(),
                    reference = %request.reference(),
                    error = %e,
                    "VoguePay request failed"
                );
                GatewayError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                operation = %request.operation(),
                status = status.as_u16(),
                "VoguePay returned error status"
            );
            return Err(GatewayError::HttpStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        tracing::debug!(
            operation = %request.operation(),
            bytes = body.len(),
            "VoguePay reply received"
        );

        Ok(body.to_vec())
    }
}
