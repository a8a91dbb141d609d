use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::ports::{GatewayLog, GatewayLogEntry};

/// Append-only gateway log that also emits each entry as a tracing event.
#[derive(Default)]
pub struct InMemoryGatewayLog {
    entries: RwLock<Vec<GatewayLogEntry>>,
}

impl InMemoryGatewayLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<GatewayLogEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl GatewayLog for InMemoryGatewayLog {
    async fn append(&self, entry: GatewayLogEntry) -> Result<(), DomainError> {
        tracing::info!(
            gateway = %entry.gateway,
            status = %entry.status,
            payload = %entry.payload,
            "Gateway log"
        );
        self.entries.write().await.push(entry);
        Ok(())
    }
}
