//! Gateway handlers.
//!
//! ## Commands
//! - Initiating a card payment
//! - Settling processor callbacks
//!
//! ## Queries
//! - Looking up a transaction at the processor

mod handle_callback;
mod initiate_payment;
mod query_transaction;

// Commands
pub use handle_callback::{CallbackPorts, HandleCallbackCommand, HandleCallbackHandler};
pub use initiate_payment::{
    InitiatePaymentCommand, InitiatePaymentHandler, PaymentInitiation, GENERIC_FAILURE_MESSAGE,
};

// Queries
pub use query_transaction::{QueryTransactionHandler, QueryTransactionQuery};
