//! HTTP handlers for processor callbacks.
//!
//! Non-fatal outcomes answer with `303 See Other` to the invoice page.
//! Fatal errors halt with a plain-text body and no redirect.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;

use crate::application::handlers::gateway::{
    CallbackPorts, HandleCallbackCommand, HandleCallbackHandler, QueryTransactionHandler,
    QueryTransactionQuery,
};
use crate::domain::foundation::TransactionId;
use crate::domain::gateway::{CallbackOutcome, CallbackPayload, GatewayError};

use super::dto::TransactionResponse;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the callback routes.
#[derive(Clone)]
pub struct CallbackAppState {
    pub ports: CallbackPorts,
    pub module_name: Arc<str>,
    /// Host base URL used for invoice redirects, ending in `/`.
    pub system_url: Arc<str>,
}

impl CallbackAppState {
    pub fn new(
        ports: CallbackPorts,
        module_name: impl Into<Arc<str>>,
        system_url: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            ports,
            module_name: module_name.into(),
            system_url: system_url.into(),
        }
    }

    pub fn callback_handler(&self) -> HandleCallbackHandler {
        HandleCallbackHandler::new(self.ports.clone(), self.module_name.as_ref())
    }

    pub fn query_handler(&self) -> QueryTransactionHandler {
        QueryTransactionHandler::new(
            self.ports.config_store.clone(),
            self.ports.processor.clone(),
            self.module_name.as_ref(),
        )
    }

    fn redirect(&self, outcome: &CallbackOutcome) -> Redirect {
        Redirect::to(&outcome.redirect().location(&self.system_url))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /callback - Processor notification (url-encoded form)
pub async fn handle_notification(
    State(state): State<CallbackAppState>,
    body: Bytes,
) -> Result<Redirect, CallbackApiError> {
    let payload = CallbackPayload::from_form(&body)?;
    settle(&state, payload).await
}

/// POST /callback/redirect - Browser redirect (JSON envelope)
pub async fn handle_redirect(
    State(state): State<CallbackAppState>,
    body: Bytes,
) -> Result<Redirect, CallbackApiError> {
    let payload = CallbackPayload::from_redirect_json(&body)?;
    settle(&state, payload).await
}

/// GET /transactions/:transaction_id - Verified processor status
pub async fn get_transaction(
    State(state): State<CallbackAppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<TransactionResponse>, CallbackApiError> {
    let transaction_id = TransactionId::new(transaction_id).map_err(GatewayError::from)?;
    let signed = state
        .query_handler()
        .handle(QueryTransactionQuery { transaction_id })
        .await?;

    Ok(Json(signed.into()))
}

async fn settle(
    state: &CallbackAppState,
    payload: CallbackPayload,
) -> Result<Redirect, CallbackApiError> {
    let outcome = state
        .callback_handler()
        .handle(HandleCallbackCommand { payload })
        .await?;

    tracing::info!(
        invoice_id = %outcome.invoice_id,
        transaction_id = %outcome.transaction_id,
        status = %outcome.transaction_status(),
        success = outcome.payment_success,
        "Callback resolved"
    );

    Ok(state.redirect(&outcome))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that halts the request with a plain-text body.
#[derive(Debug)]
pub struct CallbackApiError(GatewayError);

impl From<GatewayError> for CallbackApiError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for CallbackApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Callback halted");
        } else {
            tracing::warn!(error = %self.0, "Callback halted");
        }

        let body = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal error".to_string(),
            _ => self.0.to_string(),
        };
        (status, body).into_response()
    }
}
