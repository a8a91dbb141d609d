//! Foundation module - Shared domain primitives.
//!
//! Identifiers, error types and the state machine trait used across the
//! gateway domain.

mod errors;
mod ids;
mod state_machine;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ClientId, InvoiceId, TransactionId};
pub use state_machine::StateMachine;
