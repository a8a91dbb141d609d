//! HTTP adapters - REST API implementations.

pub mod callback;

pub use callback::callback_router;
pub use callback::CallbackAppState;
