//! VoguePay gateway domain.
//!
//! Request signing, reply and callback decoding, integrity verification and
//! the settlement rules. Nothing in here performs I/O.

mod callback;
mod credentials;
mod errors;
mod integrity;
mod merchant_ref;
mod request;
mod response;
mod settlement;

pub use callback::{CallbackOutcome, CallbackState, InvoiceRedirect, RejectionReason, Resolution};
pub use credentials::{MerchantCredentials, DEMO_MERCHANT_ID};
pub use errors::{ErrorCategory, GatewayError, HASH_FAILURE_STATUS};
pub use integrity::{request_hash, response_hash, verify_response, NonceReference};
pub use merchant_ref::{MerchantReference, REFERENCE_DELIMITER};
pub use request::{
    CardDetails, CardExpiry, Cardholder, Operation, OutboundRequest, PaymentDetails, ReturnUrls,
};
pub use response::{
    decode_reply, CallbackPayload, CardReply, QueryReply, SignedPayload, SignedTransaction,
    TransactionReport, TransactionStatus, RESPONSE_PREFIX_LEN,
};
pub use settlement::{decide, SettlementDecision, SettlementRecord};
