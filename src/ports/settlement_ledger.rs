//! SettlementLedger port - The host's invoice payment ledger.
//!
//! The ledger is the idempotency store for settlements: the processor may
//! deliver the same callback several times (retries, browser redirect plus
//! server notification), and every delivery must converge on a single
//! payment record.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TransactionId};
use crate::domain::gateway::SettlementRecord;

/// Result of attempting to apply a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// Record was inserted (first settlement for this transaction).
    Inserted,
    /// A record with the same transaction id already exists.
    AlreadyExists,
}

/// Port for recording invoice payments keyed by transaction id.
///
/// Implementations must make `apply_payment` a conditional insert
/// (`ON CONFLICT DO NOTHING` on a unique transaction id) so concurrent
/// deliveries of one transaction cannot both settle.
#[async_trait]
pub trait SettlementLedger: Send + Sync {
    /// Find the settlement recorded for a transaction, if any.
    async fn find_by_transaction_id(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<SettlementRecord>, DomainError>;

    /// Apply a payment unless one already exists for its transaction id.
    async fn apply_payment(&self, record: SettlementRecord) -> Result<SaveResult, DomainError>;
}
