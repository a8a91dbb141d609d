//! Application handlers.
//!
//! Command and query handlers that orchestrate gateway operations.

pub mod gateway;

pub use gateway::{
    CallbackPorts, HandleCallbackCommand, HandleCallbackHandler, InitiatePaymentCommand,
    InitiatePaymentHandler, PaymentInitiation, QueryTransactionHandler, QueryTransactionQuery,
};
