//! Mock payment processor for testing.
//!
//! Replies are queued and consumed in order. Every submitted request is
//! recorded for assertions.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::gateway::{GatewayError, OutboundRequest};
use crate::ports::PaymentProcessor;

#[derive(Default)]
pub struct MockPaymentProcessor {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    replies: VecDeque<Result<Vec<u8>, GatewayError>>,
    submitted: Vec<OutboundRequest>,
}

impl MockPaymentProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw reply body, prefix included.
    pub fn respond_with(&self, body: impl Into<Vec<u8>>) {
        self.state().replies.push_back(Ok(body.into()));
    }

    /// Queue an error for the next submission.
    pub fn fail_with(&self, error: GatewayError) {
        self.state().replies.push_back(Err(error));
    }

    /// Requests submitted so far.
    pub fn submitted(&self) -> Vec<OutboundRequest> {
        self.state().submitted.clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl PaymentProcessor for MockPaymentProcessor {
    async fn submit(&self, request: &OutboundRequest) -> Result<Vec<u8>, GatewayError> {
        let mut state = self.state();
        state.submitted.push(request.clone());
        state
            .replies
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Transport("no reply queued".to_string())))
    }
}
