//! Callback lifecycle and its observable outcome.
//!
//! ```text
//! Received ──► Verified ──► DuplicateChecked ──► Settled
//!     │                            │
//!     └──────────► Rejected ◄──────┘
//! ```

use crate::domain::foundation::{InvoiceId, StateMachine, TransactionId};

use super::errors::HASH_FAILURE_STATUS;
use super::response::TransactionStatus;

/// Stage of a single callback as it moves through the settler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackState {
    /// Payload parsed and merchant reference split.
    Received,
    /// Processor hash verified.
    Verified,
    /// Invoice resolved and ledger checked for the transaction id.
    DuplicateChecked,
    /// Payment applied, or invoice already paid.
    Settled,
    /// Nothing applied.
    Rejected,
}

impl StateMachine for CallbackState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use CallbackState::*;
        matches!(
            (self, target),
            (Received, Verified)
                | (Received, Rejected)
                | (Verified, DuplicateChecked)
                | (DuplicateChecked, Settled)
                | (DuplicateChecked, Rejected)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use CallbackState::*;
        match self {
            Received => vec![Verified, Rejected],
            Verified => vec![DuplicateChecked],
            DuplicateChecked => vec![Settled, Rejected],
            Settled | Rejected => vec![],
        }
    }
}

/// Why a callback ended without applying a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    HashMismatch,
    DuplicateTransaction,
    MerchantMismatch { reported: String },
    NotApproved(TransactionStatus),
}

impl RejectionReason {
    /// Transaction status text recorded for the rejection.
    pub fn status_text(&self) -> String {
        match self {
            RejectionReason::HashMismatch => HASH_FAILURE_STATUS.to_string(),
            RejectionReason::DuplicateTransaction => "Duplicate Transaction".to_string(),
            RejectionReason::MerchantMismatch { .. } => "Merchant Mismatch".to_string(),
            RejectionReason::NotApproved(status) => status.to_string(),
        }
    }
}

/// How the callback was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// One settlement record was written.
    Settled,
    /// Invoice was paid before this callback; nothing written.
    AlreadyPaid,
    Rejected(RejectionReason),
}

/// Final result of a non-fatal callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackOutcome {
    pub invoice_id: InvoiceId,
    pub transaction_id: TransactionId,
    pub state: CallbackState,
    pub resolution: Resolution,
    pub payment_success: bool,
}

impl CallbackOutcome {
    /// Status text shown in the gateway log and to the host.
    pub fn transaction_status(&self) -> String {
        match &self.resolution {
            Resolution::Settled | Resolution::AlreadyPaid => "Success".to_string(),
            Resolution::Rejected(reason) => reason.status_text(),
        }
    }

    pub fn redirect(&self) -> InvoiceRedirect {
        InvoiceRedirect {
            invoice_id: self.invoice_id,
            success: self.payment_success,
        }
    }
}

/// Browser redirect back to the invoice view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceRedirect {
    pub invoice_id: InvoiceId,
    pub success: bool,
}

impl InvoiceRedirect {
    /// Invoice page URL under the host's system URL.
    pub fn location(&self, system_url: &str) -> String {
        let flag = if self.success {
            "paymentsuccess"
        } else {
            "paymentfailed"
        };
        format!(
            "{}viewinvoice.php?id={}&{}=true",
            system_url, self.invoice_id, flag
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [CallbackState; 5] = [
        CallbackState::Received,
        CallbackState::Verified,
        CallbackState::DuplicateChecked,
        CallbackState::Settled,
        CallbackState::Rejected,
    ];

    // ══════════════════════════════════════════════════════════════
    // State Machine Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn happy_path_reaches_settled() {
        let state = CallbackState::Received
            .transition_to(CallbackState::Verified)
            .and_then(|s| s.transition_to(CallbackState::DuplicateChecked))
            .and_then(|s| s.transition_to(CallbackState::Settled));

        assert_eq!(state, Ok(CallbackState::Settled));
    }

    #[test]
    fn hash_failure_rejects_from_received() {
        assert!(CallbackState::Received.can_transition_to(&CallbackState::Rejected));
    }

    #[test]
    fn cannot_settle_without_duplicate_check() {
        assert!(CallbackState::Verified
            .transition_to(CallbackState::Settled)
            .is_err());
        assert!(CallbackState::Received
            .transition_to(CallbackState::Settled)
            .is_err());
    }

    #[test]
    fn verified_cannot_reject_directly() {
        assert!(!CallbackState::Verified.can_transition_to(&CallbackState::Rejected));
    }

    #[test]
    fn settled_and_rejected_are_terminal() {
        assert!(CallbackState::Settled.is_terminal());
        assert!(CallbackState::Rejected.is_terminal());
        assert!(!CallbackState::Received.is_terminal());
        assert!(!CallbackState::DuplicateChecked.is_terminal());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for from in ALL_STATES {
            for to in ALL_STATES {
                assert_eq!(
                    from.can_transition_to(&to),
                    from.valid_transitions().contains(&to),
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Outcome Tests
    // ══════════════════════════════════════════════════════════════

    fn outcome(resolution: Resolution, success: bool) -> CallbackOutcome {
        CallbackOutcome {
            invoice_id: InvoiceId::new(123),
            transaction_id: TransactionId::new("tx-1").unwrap(),
            state: CallbackState::Rejected,
            resolution,
            payment_success: success,
        }
    }

    #[test]
    fn hash_mismatch_reports_verification_failure() {
        let outcome = outcome(Resolution::Rejected(RejectionReason::HashMismatch), false);
        assert_eq!(outcome.transaction_status(), "Hash Verification Failure");
    }

    #[test]
    fn declined_reports_processor_status() {
        let outcome = outcome(
            Resolution::Rejected(RejectionReason::NotApproved(TransactionStatus::Declined)),
            false,
        );
        assert_eq!(outcome.transaction_status(), "Declined");
    }

    #[test]
    fn redirect_location_carries_success_flag() {
        let redirect = outcome(Resolution::Settled, true).redirect();
        assert_eq!(
            redirect.location("https://billing.example.com/"),
            "https://billing.example.com/viewinvoice.php?id=123&paymentsuccess=true"
        );
    }

    #[test]
    fn redirect_location_carries_failure_flag() {
        let redirect = outcome(Resolution::Rejected(RejectionReason::HashMismatch), false).redirect();
        assert!(redirect
            .location("https://billing.example.com/")
            .ends_with("id=123&paymentfailed=true"));
    }
}
