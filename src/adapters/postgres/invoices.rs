//! PostgreSQL implementation of InvoiceRepository.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::foundation::{ClientId, DomainError, ErrorCode, InvoiceId};
use crate::ports::{Invoice, InvoiceRepository, InvoiceStatus};

use super::ids::{id_from_db, id_to_db};

pub struct PostgresInvoiceRepository {
    pool: PgPool,
}

impl PostgresInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: i64,
    client_id: i64,
    status: String,
    total: Decimal,
    currency: String,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = DomainError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        Ok(Invoice {
            id: InvoiceId::new(id_from_db(row.id, "invoice id")?),
            client_id: ClientId::new(id_from_db(row.client_id, "client_id")?),
            status: parse_status(&row.status)?,
            total: row.total,
            currency: row.currency,
        })
    }
}

fn parse_status(s: &str) -> Result<InvoiceStatus, DomainError> {
    match s {
        "unpaid" => Ok(InvoiceStatus::Unpaid),
        "paid" => Ok(InvoiceStatus::Paid),
        "cancelled" => Ok(InvoiceStatus::Cancelled),
        "refunded" => Ok(InvoiceStatus::Refunded),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid invoice status: {}", s),
        )),
    }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
    async fn resolve(
        &self,
        invoice_id: InvoiceId,
        gateway_label: &str,
    ) -> Result<Option<Invoice>, DomainError> {
        let row: Option<InvoiceRow> = sqlx::query_as(
            r#"
            SELECT id, client_id, status, total, currency
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(id_to_db(invoice_id.as_u64(), "invoice id")?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch invoice: {}", e),
            )
        })?;

        if row.is_none() {
            tracing::debug!(%invoice_id, gateway = gateway_label, "Invoice not found");
        }
        row.map(Invoice::try_from).transpose()
    }
}
