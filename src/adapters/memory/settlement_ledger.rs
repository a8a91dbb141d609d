use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, TransactionId};
use crate::domain::gateway::SettlementRecord;
use crate::ports::{InvoiceStatus, SaveResult, SettlementLedger};

use super::InMemoryInvoiceRepository;

/// Ledger keyed by transaction id.
///
/// When linked to an invoice repository, applying a payment that covers the
/// invoice total marks the invoice paid, as the host does.
#[derive(Default)]
pub struct InMemorySettlementLedger {
    records: RwLock<HashMap<TransactionId, SettlementRecord>>,
    invoices: Option<Arc<InMemoryInvoiceRepository>>,
}

impl InMemorySettlementLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn linked_to(invoices: Arc<InMemoryInvoiceRepository>) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            invoices: Some(invoices),
        }
    }

    /// All records, oldest first.
    pub async fn records(&self) -> Vec<SettlementRecord> {
        let mut records: Vec<_> = self.records.read().await.values().cloned().collect();
        records.sort_by_key(|r| r.recorded_at);
        records
    }
}

#[async_trait]
impl SettlementLedger for InMemorySettlementLedger {
    async fn find_by_transaction_id(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<SettlementRecord>, DomainError> {
        Ok(self.records.read().await.get(transaction_id).cloned())
    }

    async fn apply_payment(&self, record: SettlementRecord) -> Result<SaveResult, DomainError> {
        let invoice_id = record.invoice_id;
        let paid_total = {
            let mut records = self.records.write().await;
            if records.contains_key(&record.transaction_id) {
                return Ok(SaveResult::AlreadyExists);
            }
            records.insert(record.transaction_id.clone(), record);
            records
                .values()
                .filter(|r| r.invoice_id == invoice_id)
                .map(|r| r.amount)
                .sum::<rust_decimal::Decimal>()
        };

        if let Some(invoices) = &self.invoices {
            if let Some(invoice) = invoices.get(invoice_id).await {
                if paid_total >= invoice.total {
                    invoices.set_status(invoice_id, InvoiceStatus::Paid).await;
                }
            }
        }

        Ok(SaveResult::Inserted)
    }
}
