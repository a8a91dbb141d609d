//! GatewayLog port - Host's gateway transaction log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::foundation::DomainError;

/// One debugging entry in the host's gateway log.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayLogEntry {
    /// Display label of the gateway.
    pub gateway: String,

    /// Payload as received from the processor.
    pub payload: serde_json::Value,

    /// Status text (processor message or settlement status).
    pub status: String,

    pub logged_at: DateTime<Utc>,
}

impl GatewayLogEntry {
    pub fn new(
        gateway: impl Into<String>,
        payload: serde_json::Value,
        status: impl Into<String>,
    ) -> Self {
        Self {
            gateway: gateway.into(),
            payload,
            status: status.into(),
            logged_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait GatewayLog: Send + Sync {
    async fn append(&self, entry: GatewayLogEntry) -> Result<(), DomainError>;
}
