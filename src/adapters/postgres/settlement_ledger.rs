//! PostgreSQL implementation of SettlementLedger.
//!
//! The primary key on `transaction_id` makes `apply_payment` a single
//! conditional insert, so concurrent callbacks for one transaction settle once.
//! The insert and the invoice status update share one database transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, InvoiceId, TransactionId};
use crate::domain::gateway::SettlementRecord;
use crate::ports::{SaveResult, SettlementLedger};

use super::ids::{id_from_db, id_to_db};

pub struct PostgresSettlementLedger {
    pool: PgPool,
}

impl PostgresSettlementLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the bundled schema migrations.
    pub async fn migrate(&self) -> Result<(), DomainError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to run migrations: {}", e),
                )
            })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SettlementRow {
    transaction_id: String,
    invoice_id: i64,
    amount: Decimal,
    fee: Decimal,
    gateway: String,
    recorded_at: DateTime<Utc>,
}

impl TryFrom<SettlementRow> for SettlementRecord {
    type Error = DomainError;

    fn try_from(row: SettlementRow) -> Result<Self, Self::Error> {
        let invoice_id = id_from_db(row.invoice_id, "invoice_id")?;
        let transaction_id = TransactionId::new(row.transaction_id).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid transaction_id: {}", e),
            )
        })?;

        Ok(SettlementRecord {
            invoice_id: InvoiceId::new(invoice_id),
            transaction_id,
            amount: row.amount,
            fee: row.fee,
            gateway: row.gateway,
            recorded_at: row.recorded_at,
        })
    }
}

#[async_trait]
impl SettlementLedger for PostgresSettlementLedger {
    async fn find_by_transaction_id(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<SettlementRecord>, DomainError> {
        let row: Option<SettlementRow> = sqlx::query_as(
            r#"
            SELECT transaction_id, invoice_id, amount, fee, gateway, recorded_at
            FROM gateway_settlements
            WHERE transaction_id = $1
            "#,
        )
        .bind(transaction_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch settlement: {}", e),
            )
        })?;

        row.map(SettlementRecord::try_from).transpose()
    }

    async fn apply_payment(&self, record: SettlementRecord) -> Result<SaveResult, DomainError> {
        let invoice_id = id_to_db(record.invoice_id.as_u64(), "invoice_id")?;
        let db_error = |action: &str, e: sqlx::Error| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to {}: {}", action, e),
            )
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin settlement", e))?;

        let result = sqlx::query(
            r#"
            INSERT INTO gateway_settlements (
                transaction_id, invoice_id, amount, fee, gateway, recorded_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (transaction_id) DO NOTHING
            "#,
        )
        .bind(record.transaction_id.as_str())
        .bind(invoice_id)
        .bind(record.amount)
        .bind(record.fee)
        .bind(&record.gateway)
        .bind(record.recorded_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("apply payment", e))?;

        if result.rows_affected() == 0 {
            tracing::info!(
                transaction_id = %record.transaction_id,
                "Settlement already recorded"
            );
            tx.rollback()
                .await
                .map_err(|e| db_error("roll back settlement", e))?;
            return Ok(SaveResult::AlreadyExists);
        }

        let marked = sqlx::query(
            r#"
            UPDATE invoices SET status = 'paid'
            WHERE id = $1
              AND status = 'unpaid'
              AND total <= (
                  SELECT COALESCE(SUM(amount), 0)
                  FROM gateway_settlements
                  WHERE invoice_id = $1
              )
            "#,
        )
        .bind(invoice_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("update invoice status", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("commit settlement", e))?;

        if marked.rows_affected() > 0 {
            tracing::info!(invoice_id = %record.invoice_id, "Invoice marked paid");
        }
        Ok(SaveResult::Inserted)
    }
}
