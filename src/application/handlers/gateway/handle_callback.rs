//! HandleCallbackHandler - Command handler for processor callbacks.
//!
//! Drives a callback through the settlement lifecycle:
//!
//! 1. Parse the merchant reference (fatal on failure)
//! 2. Verify the processor hash (rejects on mismatch)
//! 3. Fetch the processor's own record with a signed `query`
//! 4. Resolve the invoice and client, record the gateway log entry
//! 5. Short-circuit paid invoices and known transactions
//! 6. Decide and apply at most one payment

use std::sync::Arc;

use crate::domain::foundation::{
    DomainError, ErrorCode, InvoiceId, StateMachine, TransactionId, ValidationError,
};
use crate::domain::gateway::{
    decide, verify_response, CallbackOutcome, CallbackPayload, CallbackState, GatewayError,
    MerchantReference, RejectionReason, Resolution, SettlementDecision, SettlementRecord,
    SignedTransaction, TransactionReport, HASH_FAILURE_STATUS,
};
use crate::ports::{
    Client, ClientRepository, GatewayConfigStore, GatewayLog, GatewayLogEntry, GatewaySettings,
    InvoiceRepository, PaymentProcessor, SaveResult, SettlementLedger,
};

use super::query_transaction::lookup_transaction;

/// Command to settle one inbound callback.
#[derive(Debug, Clone)]
pub struct HandleCallbackCommand {
    pub payload: CallbackPayload,
}

/// Host collaborators used while settling.
#[derive(Clone)]
pub struct CallbackPorts {
    pub config_store: Arc<dyn GatewayConfigStore>,
    pub processor: Arc<dyn PaymentProcessor>,
    pub invoices: Arc<dyn InvoiceRepository>,
    pub clients: Arc<dyn ClientRepository>,
    pub ledger: Arc<dyn SettlementLedger>,
    pub gateway_log: Arc<dyn GatewayLog>,
}

/// Handler for processor notifications and browser redirects.
///
/// Returns `Err` only for failures that must halt the request; every other
/// path ends in a [`CallbackOutcome`] whose redirect carries the success flag.
pub struct HandleCallbackHandler {
    ports: CallbackPorts,
    module_name: String,
}

impl HandleCallbackHandler {
    pub fn new(ports: CallbackPorts, module_name: impl Into<String>) -> Self {
        Self {
            ports,
            module_name: module_name.into(),
        }
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub async fn handle(&self, cmd: HandleCallbackCommand) -> Result<CallbackOutcome, GatewayError> {
        let settings = self
            .ports
            .config_store
            .active_gateway(&self.module_name)
            .await?
            .ok_or(GatewayError::ModuleInactive)?;

        tracing::debug!(kind = cmd.payload.kind(), "Processing callback");

        let confirmed = match cmd.payload {
            CallbackPayload::Notification(signed) | CallbackPayload::Redirect(signed) => {
                let SignedTransaction {
                    transaction: claimed,
                    salt,
                    hash,
                } = signed;
                let reference = MerchantReference::parse(&claimed.merchant_ref)?;

                if verify_response(&settings.credentials, &salt, &hash).is_err() {
                    return self.reject_unverified(&settings, reference, claimed).await;
                }

                let confirmed = self.confirm(&settings, &claimed.transaction_id).await?;
                if !matches_claim(&claimed, &confirmed) {
                    tracing::warn!(
                        transaction_id = %claimed.transaction_id,
                        claimed_ref = %claimed.merchant_ref,
                        confirmed_ref = %confirmed.merchant_ref,
                        "Callback fields differ from processor record, using processor record"
                    );
                }
                confirmed
            }
            CallbackPayload::Lookup(transaction_id) => {
                self.confirm(&settings, &transaction_id).await?
            }
        };

        self.settle(&settings, confirmed).await
    }

    /// Fetches the processor's signed record of a transaction. Callback
    /// bodies only carry a signature over the salt, so their transaction
    /// fields are never settled from directly.
    async fn confirm(
        &self,
        settings: &GatewaySettings,
        transaction_id: &TransactionId,
    ) -> Result<TransactionReport, GatewayError> {
        let signed = lookup_transaction(
            self.ports.processor.as_ref(),
            &settings.credentials,
            transaction_id,
        )
        .await?;
        Ok(signed.transaction)
    }

    async fn reject_unverified(
        &self,
        settings: &GatewaySettings,
        reference: MerchantReference,
        report: TransactionReport,
    ) -> Result<CallbackOutcome, GatewayError> {
        tracing::warn!(
            transaction_id = %report.transaction_id,
            invoice_id = %reference.invoice_id,
            "Callback hash verification failed"
        );
        self.log(settings, &report, HASH_FAILURE_STATUS).await;

        Ok(CallbackOutcome {
            invoice_id: reference.invoice_id,
            transaction_id: report.transaction_id,
            state: advance(CallbackState::Received, CallbackState::Rejected)?,
            resolution: Resolution::Rejected(RejectionReason::HashMismatch),
            payment_success: false,
        })
    }

    async fn settle(
        &self,
        settings: &GatewaySettings,
        report: TransactionReport,
    ) -> Result<CallbackOutcome, GatewayError> {
        let reference = MerchantReference::parse(&report.merchant_ref)?;
        let state = advance(CallbackState::Received, CallbackState::Verified)?;

        let invoice = self
            .ports
            .invoices
            .resolve(reference.invoice_id, &settings.display_name)
            .await?
            .ok_or(GatewayError::InvoiceNotFound(reference.invoice_id))?;

        if invoice.client_id != reference.client_id {
            return Err(ValidationError::invalid_format(
                "merchant_ref",
                format!(
                    "invoice {} does not belong to client {}",
                    invoice.id, reference.client_id
                ),
            )
            .into());
        }

        let client = self
            .ports
            .clients
            .find(reference.client_id)
            .await?
            .ok_or(GatewayError::ClientNotFound(reference.client_id))?;

        let status_text = report
            .response_message
            .clone()
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| report.status.to_string());
        self.log(settings, &report, &status_text).await;

        let token_stored = self.persist_token(&client, &report).await?;

        let state = advance(state, CallbackState::DuplicateChecked)?;

        if invoice.is_paid() {
            tracing::info!(
                invoice_id = %invoice.id,
                transaction_id = %report.transaction_id,
                "Invoice already paid, nothing to apply"
            );
            return Ok(CallbackOutcome {
                invoice_id: invoice.id,
                transaction_id: report.transaction_id,
                state: advance(state, CallbackState::Settled)?,
                resolution: Resolution::AlreadyPaid,
                payment_success: true,
            });
        }

        if self
            .ports
            .ledger
            .find_by_transaction_id(&report.transaction_id)
            .await?
            .is_some()
        {
            return self.duplicate(state, invoice.id, report);
        }

        match decide(&settings.credentials, &report) {
            SettlementDecision::Settle => {
                let record = SettlementRecord::from_report(invoice.id, &report, &self.module_name);
                match self.ports.ledger.apply_payment(record).await? {
                    SaveResult::Inserted => {
                        tracing::info!(
                            invoice_id = %invoice.id,
                            transaction_id = %report.transaction_id,
                            amount = %report.total_amount,
                            "Payment applied"
                        );
                        Ok(CallbackOutcome {
                            invoice_id: invoice.id,
                            transaction_id: report.transaction_id,
                            state: advance(state, CallbackState::Settled)?,
                            resolution: Resolution::Settled,
                            payment_success: true,
                        })
                    }
                    // Concurrent delivery won the insert.
                    SaveResult::AlreadyExists => self.duplicate(state, invoice.id, report),
                }
            }
            SettlementDecision::Reject(reason) => {
                if let RejectionReason::NotApproved(_) = &reason {
                    if !client.has_token() && !token_stored {
                        self.ports.clients.clear_card_details(client.id).await?;
                        tracing::info!(client_id = %client.id, "Cleared card details after unapproved payment");
                    }
                }

                tracing::info!(
                    invoice_id = %invoice.id,
                    transaction_id = %report.transaction_id,
                    reason = %reason.status_text(),
                    "Callback rejected"
                );
                Ok(CallbackOutcome {
                    invoice_id: invoice.id,
                    transaction_id: report.transaction_id,
                    state: advance(state, CallbackState::Rejected)?,
                    resolution: Resolution::Rejected(reason),
                    payment_success: false,
                })
            }
        }
    }

    fn duplicate(
        &self,
        state: CallbackState,
        invoice_id: InvoiceId,
        report: TransactionReport,
    ) -> Result<CallbackOutcome, GatewayError> {
        tracing::info!(
            invoice_id = %invoice_id,
            transaction_id = %report.transaction_id,
            "Transaction already settled"
        );
        Ok(CallbackOutcome {
            invoice_id,
            transaction_id: report.transaction_id,
            state: advance(state, CallbackState::Rejected)?,
            resolution: Resolution::Rejected(RejectionReason::DuplicateTransaction),
            payment_success: true,
        })
    }

    /// Stores a reusable token from the report. Returns true if one was stored.
    async fn persist_token(
        &self,
        client: &Client,
        report: &TransactionReport,
    ) -> Result<bool, GatewayError> {
        match report.token.as_deref() {
            Some(token) if !token.is_empty() => {
                self.ports.clients.store_token(client.id, token).await?;
                tracing::debug!(client_id = %client.id, "Stored processor token");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Appends to the host's gateway log. A failing log never blocks the
    /// callback.
    async fn log(&self, settings: &GatewaySettings, report: &TransactionReport, status: &str) {
        let payload = match serde_json::to_value(report) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(
                    transaction_id = %report.transaction_id,
                    error = %e,
                    "Failed to serialize transaction for gateway log"
                );
                return;
            }
        };

        if let Err(e) = self
            .ports
            .gateway_log
            .append(GatewayLogEntry::new(&settings.display_name, payload, status))
            .await
        {
            tracing::error!(
                transaction_id = %report.transaction_id,
                status = status,
                error = %e,
                "Failed to write gateway log entry"
            );
        }
    }
}

/// True when the processor record agrees with what the callback claimed.
fn matches_claim(claimed: &TransactionReport, confirmed: &TransactionReport) -> bool {
    claimed.merchant_ref == confirmed.merchant_ref
        && claimed.status == confirmed.status
        && claimed.total_amount == confirmed.total_amount
}

fn advance(state: CallbackState, next: CallbackState) -> Result<CallbackState, GatewayError> {
    state
        .transition_to(next)
        .map_err(|e| DomainError::new(ErrorCode::InvalidStateTransition, e.to_string()).into())
}
