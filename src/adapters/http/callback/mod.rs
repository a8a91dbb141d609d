//! HTTP adapter for processor callbacks.
//!
//! - `POST /callback` - Processor notification
//! - `POST /callback/redirect` - Browser redirect after payment
//! - `GET /transactions/:transaction_id` - Verified transaction status

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::TransactionResponse;
pub use handlers::{CallbackApiError, CallbackAppState};
pub use routes::callback_router;
