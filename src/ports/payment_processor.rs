//! Payment processor port for the VoguePay command API.
//!
//! The port carries raw bytes only. Prefix stripping, decoding and hash
//! verification happen in the application layer so every transport gets
//! the same integrity checks.

use async_trait::async_trait;

use crate::domain::gateway::{GatewayError, OutboundRequest};

/// Port for submitting signed requests to the processor.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// POST the request as the `json` form field and return the raw reply body.
    ///
    /// # Errors
    ///
    /// - `GatewayError::Transport` when the call cannot be completed
    /// - `GatewayError::HttpStatus` for a non-success HTTP status
    async fn submit(&self, request: &OutboundRequest) -> Result<Vec<u8>, GatewayError>;
}
