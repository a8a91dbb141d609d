//! Inbound wire types: command API replies and callback payloads.
//!
//! Every type here carries a `salt`/`hash` pair and must be verified with
//! [`verify_response`](super::integrity::verify_response) before any other
//! field is trusted.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::TransactionId;

use super::errors::GatewayError;

/// Number of bytes the command API emits ahead of the JSON document.
pub const RESPONSE_PREFIX_LEN: usize = 3;

/// Status literal for a successful command submission.
const API_STATUS_OK: &str = "OK";

/// Strips the fixed prefix from a command API body and decodes the JSON.
///
/// # Errors
///
/// `GatewayError::MalformedResponse` when the body is shorter than the
/// prefix or the remainder is not the expected JSON document.
pub fn decode_reply<T: DeserializeOwned>(body: &[u8]) -> Result<T, GatewayError> {
    let payload = body.get(RESPONSE_PREFIX_LEN..).ok_or_else(|| {
        GatewayError::MalformedResponse(format!("body too short ({} bytes)", body.len()))
    })?;

    serde_json::from_slice(payload).map_err(|e| GatewayError::MalformedResponse(e.to_string()))
}

/// A payload carrying the processor's salt and integrity hash.
pub trait SignedPayload {
    fn salt(&self) -> &str;
    fn hash(&self) -> &str;
}

// ════════════════════════════════════════════════════════════════════════════════
// Command API Replies
// ════════════════════════════════════════════════════════════════════════════════

/// Reply to a `card` request.
#[derive(Debug, Clone, Deserialize)]
pub struct CardReply {
    pub status: String,
    pub salt: String,
    pub hash: String,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
}

impl CardReply {
    pub fn is_ok(&self) -> bool {
        self.status == API_STATUS_OK
    }
}

impl SignedPayload for CardReply {
    fn salt(&self) -> &str {
        &self.salt
    }

    fn hash(&self) -> &str {
        &self.hash
    }
}

/// Reply to a `query` request: the transaction fields at the top level.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryReply {
    #[serde(flatten)]
    pub transaction: TransactionReport,
    pub salt: String,
    pub hash: String,
}

impl SignedPayload for QueryReply {
    fn salt(&self) -> &str {
        &self.salt
    }

    fn hash(&self) -> &str {
        &self.hash
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Transaction Report
// ════════════════════════════════════════════════════════════════════════════════

/// Processor-side outcome of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionStatus {
    Approved,
    Declined,
    Pending,
    Failed,
    Other(String),
}

impl TransactionStatus {
    pub fn is_approved(&self) -> bool {
        matches!(self, TransactionStatus::Approved)
    }

    pub fn as_str(&self) -> &str {
        match self {
            TransactionStatus::Approved => "Approved",
            TransactionStatus::Declined => "Declined",
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Failed => "Failed",
            TransactionStatus::Other(s) => s,
        }
    }
}

impl From<String> for TransactionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Approved" => TransactionStatus::Approved,
            "Declined" => TransactionStatus::Declined,
            "Pending" => TransactionStatus::Pending,
            "Failed" => TransactionStatus::Failed,
            _ => TransactionStatus::Other(value),
        }
    }
}

impl From<TransactionStatus> for String {
    fn from(status: TransactionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction fields shared by query replies and callbacks.
///
/// `merchant_ref` stays raw here; it is split into invoice and client ids by
/// the settler so a malformed reference surfaces as a validation failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionReport {
    pub transaction_id: TransactionId,
    pub merchant_id: String,
    pub merchant_ref: String,
    pub status: TransactionStatus,
    pub total_amount: Decimal,
    #[serde(default, alias = "fee")]
    pub charges: Option<Decimal>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub response_message: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Callback Payloads
// ════════════════════════════════════════════════════════════════════════════════

/// A transaction report together with the processor's signature.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub transaction: TransactionReport,
    pub salt: String,
    pub hash: String,
}

impl SignedPayload for SignedTransaction {
    fn salt(&self) -> &str {
        &self.salt
    }

    fn hash(&self) -> &str {
        &self.hash
    }
}

impl From<QueryReply> for SignedTransaction {
    fn from(reply: QueryReply) -> Self {
        Self {
            transaction: reply.transaction,
            salt: reply.salt,
            hash: reply.hash,
        }
    }
}

/// Asynchronous notification posted as a url-encoded form.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NotificationForm {
    transaction_id: TransactionId,
    merchant_id: String,
    merchant_ref: String,
    status: TransactionStatus,
    total_amount: Decimal,
    #[serde(default, alias = "fee")]
    charges: Option<Decimal>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    response_message: Option<String>,
    salt: String,
    hash: String,
}

impl From<NotificationForm> for SignedTransaction {
    fn from(form: NotificationForm) -> Self {
        Self {
            transaction: TransactionReport {
                transaction_id: form.transaction_id,
                merchant_id: form.merchant_id,
                merchant_ref: form.merchant_ref,
                status: form.status,
                total_amount: form.total_amount,
                charges: form.charges,
                token: form.token,
                response_message: form.response_message,
            },
            salt: form.salt,
            hash: form.hash,
        }
    }
}

/// Notification carrying only the transaction id; details are fetched with a
/// `query` request.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LookupForm {
    transaction_id: TransactionId,
}

/// Browser redirect body: transaction nested under `transaction`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RedirectEnvelope {
    transaction: TransactionReport,
    salt: String,
    hash: String,
}

/// Every callback shape the settler accepts.
///
/// The signature of a notification or redirect covers only its salt, so
/// their transaction fields are claims. The settler confirms them with a
/// `query` before acting.
#[derive(Debug, Clone)]
pub enum CallbackPayload {
    Notification(SignedTransaction),
    Redirect(SignedTransaction),
    Lookup(TransactionId),
}

impl CallbackPayload {
    /// Decodes a url-encoded callback body.
    ///
    /// A full notification is tried first, then a bare transaction lookup.
    pub fn from_form(body: &[u8]) -> Result<Self, GatewayError> {
        match serde_urlencoded::from_bytes::<NotificationForm>(body) {
            Ok(form) => Ok(CallbackPayload::Notification(form.into())),
            Err(notification_err) => serde_urlencoded::from_bytes::<LookupForm>(body)
                .map(|form| CallbackPayload::Lookup(form.transaction_id))
                .map_err(|_| GatewayError::MalformedPayload(notification_err.to_string())),
        }
    }

    /// Decodes a JSON redirect envelope.
    pub fn from_redirect_json(body: &[u8]) -> Result<Self, GatewayError> {
        let envelope: RedirectEnvelope = serde_json::from_slice(body)
            .map_err(|e| GatewayError::MalformedPayload(e.to_string()))?;

        Ok(CallbackPayload::Redirect(SignedTransaction {
            transaction: envelope.transaction,
            salt: envelope.salt,
            hash: envelope.hash,
        }))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CallbackPayload::Notification(_) => "notification",
            CallbackPayload::Redirect(_) => "redirect",
            CallbackPayload::Lookup(_) => "lookup",
        }
    }
}
