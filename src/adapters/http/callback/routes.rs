//! Axum router configuration for callback endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::ports::{NOTIFICATION_PATH, REDIRECT_PATH};

use super::handlers::{get_transaction, handle_notification, handle_redirect, CallbackAppState};

/// Create the callback router.
///
/// # Routes
///
/// ## Processor Endpoints (hash verified)
/// - `POST /callback` - Notification form or transaction lookup
/// - `POST /callback/redirect` - Browser redirect envelope
///
/// ## Admin Endpoints
/// - `GET /transactions/:transaction_id` - Query the processor for a transaction
pub fn callback_router() -> Router<CallbackAppState> {
    Router::new()
        .route(NOTIFICATION_PATH, post(handle_notification))
        .route(REDIRECT_PATH, post(handle_redirect))
        .route("/transactions/:transaction_id", get(get_transaction))
}
