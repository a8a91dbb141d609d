//! Settlement records and the approve/reject decision for verified reports.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{InvoiceId, TransactionId};

use super::callback::RejectionReason;
use super::credentials::MerchantCredentials;
use super::response::TransactionReport;

/// A payment applied to an invoice. At most one exists per transaction id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub invoice_id: InvoiceId,
    pub transaction_id: TransactionId,
    pub amount: Decimal,
    pub fee: Decimal,
    /// Gateway module the payment is attributed to.
    pub gateway: String,
    pub recorded_at: DateTime<Utc>,
}

impl SettlementRecord {
    pub fn from_report(
        invoice_id: InvoiceId,
        report: &TransactionReport,
        gateway: impl Into<String>,
    ) -> Self {
        Self {
            invoice_id,
            transaction_id: report.transaction_id.clone(),
            amount: report.total_amount,
            fee: report.charges.unwrap_or(Decimal::ZERO),
            gateway: gateway.into(),
            recorded_at: Utc::now(),
        }
    }
}

/// What to do with a verified transaction report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementDecision {
    Settle,
    Reject(RejectionReason),
}

/// Decides whether a hash-verified report may be settled.
///
/// Requires the processor's `Approved` status and a merchant id that belongs
/// to the configured account.
pub fn decide(credentials: &MerchantCredentials, report: &TransactionReport) -> SettlementDecision {
    if !report.status.is_approved() {
        return SettlementDecision::Reject(RejectionReason::NotApproved(report.status.clone()));
    }

    if !credentials.accepts_merchant(&report.merchant_id) {
        return SettlementDecision::Reject(RejectionReason::MerchantMismatch {
            reported: report.merchant_id.clone(),
        });
    }

    SettlementDecision::Settle
}
