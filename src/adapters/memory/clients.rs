use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{ClientId, DomainError, ErrorCode};
use crate::ports::{Client, ClientRepository};

#[derive(Default)]
pub struct InMemoryClientRepository {
    clients: RwLock<HashMap<ClientId, Client>>,
}

impl InMemoryClientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clients(clients: Vec<Client>) -> Self {
        Self {
            clients: RwLock::new(clients.into_iter().map(|c| (c.id, c)).collect()),
        }
    }

    pub async fn insert(&self, client: Client) {
        self.clients.write().await.insert(client.id, client);
    }

    pub async fn get(&self, id: ClientId) -> Option<Client> {
        self.clients.read().await.get(&id).cloned()
    }

    async fn update<F>(&self, client_id: ClientId, apply: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut Client) + Send,
    {
        let mut clients = self.clients.write().await;
        let client = clients.get_mut(&client_id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::ClientNotFound,
                format!("Client {} not found", client_id),
            )
        })?;
        apply(client);
        Ok(())
    }
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn find(&self, client_id: ClientId) -> Result<Option<Client>, DomainError> {
        Ok(self.get(client_id).await)
    }

    async fn store_token(&self, client_id: ClientId, token: &str) -> Result<(), DomainError> {
        let token = token.to_string();
        self.update(client_id, move |client| client.gateway_token = Some(token))
            .await
    }

    async fn clear_card_details(&self, client_id: ClientId) -> Result<(), DomainError> {
        self.update(client_id, |client| client.stored_card = None)
            .await
    }
}
