//! HTTP DTOs for the callback endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::gateway::{SignedTransaction, TransactionReport};

/// Verified processor view of a transaction.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionResponse {
    pub transaction_id: String,
    pub merchant_ref: String,
    pub status: String,
    pub total_amount: Decimal,
    pub charges: Option<Decimal>,
    pub response_message: Option<String>,
}

impl From<TransactionReport> for TransactionResponse {
    fn from(report: TransactionReport) -> Self {
        Self {
            transaction_id: report.transaction_id.to_string(),
            merchant_ref: report.merchant_ref,
            status: report.status.to_string(),
            total_amount: report.total_amount,
            charges: report.charges,
            response_message: report.response_message,
        }
    }
}

impl From<SignedTransaction> for TransactionResponse {
    fn from(signed: SignedTransaction) -> Self {
        signed.transaction.into()
    }
}
