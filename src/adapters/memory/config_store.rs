use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::ports::{GatewayConfigStore, GatewaySettings};

/// Gateway settings keyed by module name. Absent modules are inactive.
#[derive(Default)]
pub struct InMemoryGatewayConfigStore {
    gateways: RwLock<HashMap<String, GatewaySettings>>,
}

impl InMemoryGatewayConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gateway(settings: GatewaySettings) -> Self {
        let mut gateways = HashMap::new();
        gateways.insert(settings.module_name.clone(), settings);
        Self {
            gateways: RwLock::new(gateways),
        }
    }

    pub async fn activate(&self, settings: GatewaySettings) {
        self.gateways
            .write()
            .await
            .insert(settings.module_name.clone(), settings);
    }

    pub async fn deactivate(&self, module_name: &str) {
        self.gateways.write().await.remove(module_name);
    }
}

#[async_trait]
impl GatewayConfigStore for InMemoryGatewayConfigStore {
    async fn active_gateway(
        &self,
        module_name: &str,
    ) -> Result<Option<GatewaySettings>, DomainError> {
        Ok(self.gateways.read().await.get(module_name).cloned())
    }
}
