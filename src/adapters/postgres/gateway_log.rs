//! PostgreSQL implementation of GatewayLog.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{GatewayLog, GatewayLogEntry};

pub struct PostgresGatewayLog {
    pool: PgPool,
}

impl PostgresGatewayLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GatewayLog for PostgresGatewayLog {
    async fn append(&self, entry: GatewayLogEntry) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO gateway_log (gateway, payload, status, logged_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&entry.gateway)
        .bind(sqlx::types::Json(&entry.payload))
        .bind(&entry.status)
        .bind(entry.logged_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to write gateway log: {}", e),
            )
        })?;

        Ok(())
    }
}
