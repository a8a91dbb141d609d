//! PostgreSQL implementation of ClientRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{ClientId, DomainError, ErrorCode};
use crate::domain::gateway::Cardholder;
use crate::ports::{Client, ClientRepository, StoredCard};

use super::ids::{id_from_db, id_to_db};

pub struct PostgresClientRepository {
    pool: PgPool,
}

impl PostgresClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn update(
        &self,
        client_id: ClientId,
        sql: &str,
        token: Option<&str>,
    ) -> Result<(), DomainError> {
        let mut query = sqlx::query(sql).bind(id_to_db(client_id.as_u64(), "client id")?);
        if let Some(token) = token {
            query = query.bind(token);
        }

        let result = query.execute(&self.pool).await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update client: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ClientNotFound,
                format!("Client {} not found", client_id),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    address1: String,
    address2: String,
    city: String,
    state: String,
    postcode: String,
    country: String,
    phone: String,
    gateway_token: Option<String>,
    card_last_four: Option<String>,
    card_expiry: Option<String>,
}

impl TryFrom<ClientRow> for Client {
    type Error = DomainError;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        let stored_card = match (row.card_last_four, row.card_expiry) {
            (Some(last_four), Some(expiry)) if !last_four.is_empty() => {
                Some(StoredCard { last_four, expiry })
            }
            _ => None,
        };

        Ok(Client {
            id: ClientId::new(id_from_db(row.id, "client id")?),
            contact: Cardholder {
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                address1: row.address1,
                address2: row.address2,
                city: row.city,
                state: row.state,
                postcode: row.postcode,
                country: row.country,
                phone: row.phone,
            },
            gateway_token: row.gateway_token,
            stored_card,
        })
    }
}

#[async_trait]
impl ClientRepository for PostgresClientRepository {
    async fn find(&self, client_id: ClientId) -> Result<Option<Client>, DomainError> {
        let row: Option<ClientRow> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, email, address1, address2, city,
                   state, postcode, country, phone, gateway_token,
                   card_last_four, card_expiry
            FROM clients
            WHERE id = $1
            "#,
        )
        .bind(id_to_db(client_id.as_u64(), "client id")?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch client: {}", e),
            )
        })?;

        row.map(Client::try_from).transpose()
    }

    async fn store_token(&self, client_id: ClientId, token: &str) -> Result<(), DomainError> {
        self.update(
            client_id,
            "UPDATE clients SET gateway_token = $2 WHERE id = $1",
            Some(token),
        )
        .await
    }

    async fn clear_card_details(&self, client_id: ClientId) -> Result<(), DomainError> {
        self.update(
            client_id,
            "UPDATE clients SET card_last_four = NULL, card_expiry = NULL WHERE id = $1",
            None,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(card_last_four: Option<&str>) -> ClientRow {
        ClientRow {
            id: 77,
            first_name: "Ada".to_string(),
            last_name: "Obi".to_string(),
            email: "ada@example.com".to_string(),
            address1: "1 Marina".to_string(),
            address2: String::new(),
            city: "Lagos".to_string(),
            state: "LA".to_string(),
            postcode: "101001".to_string(),
            country: "NG".to_string(),
            phone: "+2348000000000".to_string(),
            gateway_token: Some("tok_1".to_string()),
            card_last_four: card_last_four.map(str::to_string),
            card_expiry: Some("0530".to_string()),
        }
    }

    #[test]
    fn row_converts_to_client() {
        let client = Client::try_from(row(Some("0008"))).unwrap();

        assert_eq!(client.id, ClientId::new(77));
        assert_eq!(client.contact.full_name(), "Ada Obi");
        assert!(client.has_token());
        assert_eq!(
            client.stored_card,
            Some(StoredCard {
                last_four: "0008".to_string(),
                expiry: "0530".to_string(),
            })
        );
    }

    #[test]
    fn cleared_card_columns_mean_no_stored_card() {
        assert!(Client::try_from(row(None)).unwrap().stored_card.is_none());
        assert!(Client::try_from(row(Some(""))).unwrap().stored_card.is_none());
    }
}
