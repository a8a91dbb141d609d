//! InvoiceRepository port - Read access to the host's invoices.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ClientId, DomainError, InvoiceId};

/// Invoice lifecycle status as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Unpaid,
    Paid,
    Cancelled,
    Refunded,
}

/// Host invoice as seen by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub client_id: ClientId,
    pub status: InvoiceStatus,
    pub total: Decimal,
    pub currency: String,
}

impl Invoice {
    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Resolve an invoice id from a callback to the host's canonical invoice.
    ///
    /// Invoices in any status resolve. Returns `None` for unknown ids; callers
    /// treat that as fatal.
    async fn resolve(
        &self,
        invoice_id: InvoiceId,
        gateway_label: &str,
    ) -> Result<Option<Invoice>, DomainError>;
}
