//! Gateway error types.
//!
//! Errors fall into five categories that decide how a request ends:
//! configuration and validation failures halt the request, integrity and
//! duplicate failures still redirect the customer, and transport failures
//! surface a generic message to the customer.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::{ClientId, DomainError, InvoiceId, TransactionId, ValidationError};

/// Status text recorded when a processor hash does not verify.
pub const HASH_FAILURE_STATUS: &str = "Hash Verification Failure";

/// Coarse classification of a [`GatewayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Integrity,
    Validation,
    Duplicate,
    Transport,
    Host,
}

/// Errors raised while talking to the processor or settling a callback.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Gateway module is not active in the host.
    #[error("Module Not Activated")]
    ModuleInactive,

    /// Gateway settings are unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Processor hash did not match the recomputed value.
    #[error("Hash Verification Failure")]
    IntegrityFailure,

    /// Merchant reference could not be split into invoice and client ids.
    #[error("Invalid merchant reference: {0}")]
    InvalidReference(#[from] ValidationError),

    /// Callback body is not one of the accepted shapes.
    #[error("Malformed callback payload: {0}")]
    MalformedPayload(String),

    /// Referenced invoice does not exist in the host.
    #[error("Invoice {0} not found")]
    InvoiceNotFound(InvoiceId),

    /// Referenced client does not exist in the host.
    #[error("Client {0} not found")]
    ClientNotFound(ClientId),

    /// Transaction was already settled.
    #[error("Duplicate transaction: {0}")]
    DuplicateTransaction(TransactionId),

    /// Outbound call failed before a response arrived.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Processor answered with a non-success HTTP status.
    #[error("Processor returned HTTP {0}")]
    HttpStatus(u16),

    /// Processor body could not be decoded.
    #[error("Malformed processor response: {0}")]
    MalformedResponse(String),

    /// A host port failed.
    #[error("Host error: {0}")]
    Host(#[from] DomainError),
}

impl GatewayError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GatewayError::ModuleInactive | GatewayError::Configuration(_) => {
                ErrorCategory::Configuration
            }
            GatewayError::IntegrityFailure => ErrorCategory::Integrity,
            GatewayError::InvalidReference(_)
            | GatewayError::MalformedPayload(_)
            | GatewayError::InvoiceNotFound(_)
            | GatewayError::ClientNotFound(_) => ErrorCategory::Validation,
            GatewayError::DuplicateTransaction(_) => ErrorCategory::Duplicate,
            GatewayError::Transport(_)
            | GatewayError::HttpStatus(_)
            | GatewayError::MalformedResponse(_) => ErrorCategory::Transport,
            GatewayError::Host(_) => ErrorCategory::Host,
        }
    }

    /// Returns true if the request must halt without redirecting.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Configuration | ErrorCategory::Validation | ErrorCategory::Host
        )
    }

    /// Maps the error to the HTTP status used when halting a callback.
    ///
    /// The processor retries callbacks that receive a 5xx.
    pub fn status_code(&self) -> StatusCode {
        match self.category() {
            ErrorCategory::Configuration => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCategory::Integrity => StatusCode::UNAUTHORIZED,
            ErrorCategory::Validation => StatusCode::BAD_REQUEST,
            ErrorCategory::Duplicate => StatusCode::OK,
            ErrorCategory::Transport => StatusCode::BAD_GATEWAY,
            ErrorCategory::Host => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
