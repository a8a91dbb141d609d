//! VoguePay command API adapter.
//!
//! Implements the `PaymentProcessor` port over HTTPS:
//! - Requests are posted as a single url-encoded `json` field
//! - At most two redirects are followed
//! - Calls are bounded by the configured timeout
//!
//! Reply bodies are returned raw; decoding and hash verification live in
//! the domain layer.

mod client;
mod mock_processor;

pub use client::{VoguePayClient, VoguePayConfig, DEFAULT_API_URL};
pub use mock_processor::MockPaymentProcessor;
