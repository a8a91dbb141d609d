//! Gateway module configuration (VoguePay merchant account)

use serde::Deserialize;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::domain::gateway::MerchantCredentials;

use super::error::ValidationError;
use super::server::Environment;

/// Longest allowed processor round trip.
const MAX_TIMEOUT_SECS: u64 = 120;

/// Gateway module configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Module name; settlements are tagged with it
    #[serde(default = "default_module_name")]
    pub module_name: String,

    /// Label shown in the gateway log
    #[serde(default = "default_display_name")]
    pub display_name: String,

    /// Whether the module is activated in the host
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// VoguePay merchant id
    #[serde(default)]
    pub merchant_id: String,

    /// Email of the VoguePay merchant account
    #[serde(default)]
    pub account_email: String,

    /// Command API token shared with the processor
    #[serde(default = "empty_secret")]
    pub command_token: SecretString,

    /// Route requests to the processor's demo environment
    #[serde(default)]
    pub demo_mode: bool,

    /// Command API endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Public base URL of the callback service (defaults to the system URL)
    pub callback_url: Option<String>,

    /// Outbound request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Developer code forwarded with card requests
    pub developer_code: Option<String>,
}

impl GatewayConfig {
    /// Merchant credentials for signing and verification.
    pub fn credentials(&self) -> MerchantCredentials {
        MerchantCredentials::new(
            self.merchant_id.clone(),
            self.account_email.clone(),
            self.command_token.clone(),
            self.demo_mode,
        )
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate gateway configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.module_name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY__MODULE_NAME"));
        }
        if self.merchant_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY__MERCHANT_ID"));
        }
        if !is_plausible_email(&self.account_email) {
            return Err(ValidationError::InvalidAccountEmail);
        }
        if !self.demo_mode && self.command_token.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY__COMMAND_TOKEN"));
        }

        if *environment == Environment::Production {
            if !self.api_url.starts_with("https://") {
                return Err(ValidationError::ApiUrlMustBeHttps);
            }
        } else if !is_http_url(&self.api_url) {
            return Err(ValidationError::InvalidUrl("API"));
        }

        if let Some(url) = &self.callback_url {
            if !is_http_url(url) {
                return Err(ValidationError::InvalidUrl("callback"));
            }
        }

        if self.request_timeout_secs == 0 || self.request_timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

fn default_module_name() -> String {
    "voguepay".to_string()
}

fn default_display_name() -> String {
    "VoguePay".to_string()
}

fn default_enabled() -> bool {
    true
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

fn default_api_url() -> String {
    "https://voguepay.com/api/".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
