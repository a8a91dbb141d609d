use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, InvoiceId};
use crate::ports::{Invoice, InvoiceRepository, InvoiceStatus};

#[derive(Default)]
pub struct InMemoryInvoiceRepository {
    invoices: RwLock<HashMap<InvoiceId, Invoice>>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_invoices(invoices: Vec<Invoice>) -> Self {
        Self {
            invoices: RwLock::new(invoices.into_iter().map(|i| (i.id, i)).collect()),
        }
    }

    pub async fn insert(&self, invoice: Invoice) {
        self.invoices.write().await.insert(invoice.id, invoice);
    }

    pub async fn get(&self, id: InvoiceId) -> Option<Invoice> {
        self.invoices.read().await.get(&id).cloned()
    }

    /// Returns false when the invoice does not exist.
    pub async fn set_status(&self, id: InvoiceId, status: InvoiceStatus) -> bool {
        match self.invoices.write().await.get_mut(&id) {
            Some(invoice) => {
                invoice.status = status;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn resolve(
        &self,
        invoice_id: InvoiceId,
        gateway_label: &str,
    ) -> Result<Option<Invoice>, DomainError> {
        let invoice = self.get(invoice_id).await;
        if invoice.is_none() {
            tracing::warn!(invoice_id = %invoice_id, gateway = %gateway_label, "Callback for unknown invoice");
        }
        Ok(invoice)
    }
}
