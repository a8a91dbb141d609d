//! GatewayConfigStore port - Per-module gateway settings kept by the host.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::gateway::MerchantCredentials;

/// Settings of an activated gateway module.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// Module name used to tag settlements (e.g. `voguepay`).
    pub module_name: String,

    /// Label shown in the gateway log and on invoices.
    pub display_name: String,

    pub credentials: MerchantCredentials,

    /// Optional developer code forwarded with card requests.
    pub developer_code: Option<String>,

    /// Base URL of the host, always ending in `/`.
    pub system_url: String,

    /// Public base URL of the callback service. Defaults to `system_url`.
    pub callback_url: Option<String>,
}

/// Route of the processor notification endpoint.
pub const NOTIFICATION_PATH: &str = "/callback";

/// Route the payer's browser is redirected to after payment.
pub const REDIRECT_PATH: &str = "/callback/redirect";

impl GatewaySettings {
    /// URL the processor posts asynchronous notifications to.
    pub fn notification_endpoint(&self) -> String {
        format!("{}{}", self.callback_base(), NOTIFICATION_PATH)
    }

    /// URL the processor redirects the payer to.
    pub fn redirect_endpoint(&self) -> String {
        format!("{}{}", self.callback_base(), REDIRECT_PATH)
    }

    fn callback_base(&self) -> &str {
        let base = match &self.callback_url {
            Some(url) if !url.trim().is_empty() => url.trim(),
            _ => self.system_url.as_str(),
        };
        base.trim_end_matches('/')
    }
}

#[async_trait]
pub trait GatewayConfigStore: Send + Sync {
    /// Settings for an active module, or `None` when the module is not activated.
    async fn active_gateway(&self, module_name: &str)
        -> Result<Option<GatewaySettings>, DomainError>;
}
