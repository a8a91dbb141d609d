//! ClientRepository port - Client records and stored payment methods.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ClientId, DomainError};
use crate::domain::gateway::Cardholder;

/// Card-on-file details kept by the host for a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCard {
    pub last_four: String,
    pub expiry: String,
}

/// Host client record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id: ClientId,
    pub contact: Cardholder,

    /// Reusable processor token for future charges.
    pub gateway_token: Option<String>,

    pub stored_card: Option<StoredCard>,
}

impl Client {
    pub fn has_token(&self) -> bool {
        self.gateway_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }
}

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn find(&self, client_id: ClientId) -> Result<Option<Client>, DomainError>;

    /// Persist a reusable processor token against the client.
    async fn store_token(&self, client_id: ClientId, token: &str) -> Result<(), DomainError>;

    /// Remove card-on-file details so the next attempt asks for a new card.
    async fn clear_card_details(&self, client_id: ClientId) -> Result<(), DomainError>;
}
