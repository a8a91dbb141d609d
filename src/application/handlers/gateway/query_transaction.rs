//! QueryTransactionHandler - Query handler for a transaction's processor status.

use std::sync::Arc;

use crate::domain::foundation::TransactionId;
use crate::domain::gateway::{
    decode_reply, verify_response, GatewayError, MerchantCredentials, NonceReference,
    OutboundRequest, QueryReply, SignedTransaction,
};
use crate::ports::{GatewayConfigStore, PaymentProcessor};

/// Query for the processor-side state of a transaction.
#[derive(Debug, Clone)]
pub struct QueryTransactionQuery {
    pub transaction_id: TransactionId,
}

/// Handler for the outbound `query` request.
pub struct QueryTransactionHandler {
    config_store: Arc<dyn GatewayConfigStore>,
    processor: Arc<dyn PaymentProcessor>,
    module_name: String,
}

impl QueryTransactionHandler {
    pub fn new(
        config_store: Arc<dyn GatewayConfigStore>,
        processor: Arc<dyn PaymentProcessor>,
        module_name: impl Into<String>,
    ) -> Self {
        Self {
            config_store,
            processor,
            module_name: module_name.into(),
        }
    }

    /// Returns the verified transaction report with its salt and hash.
    pub async fn handle(
        &self,
        query: QueryTransactionQuery,
    ) -> Result<SignedTransaction, GatewayError> {
        let settings = self
            .config_store
            .active_gateway(&self.module_name)
            .await?
            .ok_or(GatewayError::ModuleInactive)?;

        lookup_transaction(
            self.processor.as_ref(),
            &settings.credentials,
            &query.transaction_id,
        )
        .await
    }
}

/// Sends a signed `query` and verifies the reply.
pub(crate) async fn lookup_transaction(
    processor: &dyn PaymentProcessor,
    credentials: &MerchantCredentials,
    transaction_id: &TransactionId,
) -> Result<SignedTransaction, GatewayError> {
    let request = OutboundRequest::query(credentials, &NonceReference::generate(), transaction_id);

    let body = processor.submit(&request).await.map_err(|e| {
        tracing::error!(transaction_id = %transaction_id, error = %e, "Query request failed");
        e
    })?;

    let reply: QueryReply = decode_reply(&body)?;
    verify_response(credentials, &reply.salt, &reply.hash)?;

    if reply.transaction.transaction_id != *transaction_id {
        tracing::warn!(
            requested = %transaction_id,
            returned = %reply.transaction.transaction_id,
            "Query reply is for a different transaction"
        );
        return Err(GatewayError::MalformedResponse(format!(
            "reply for transaction {} does not match request",
            reply.transaction.transaction_id
        )));
    }

    Ok(reply.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryGatewayConfigStore;
    use crate::adapters::voguepay::MockPaymentProcessor;
    use crate::domain::gateway::{response_hash, Operation, TransactionStatus};
    use crate::ports::GatewaySettings;
    use rust_decimal_macros::dec;
    use secrecy::SecretString;

    fn credentials() -> MerchantCredentials {
        MerchantCredentials::new(
            "5501",
            "shop@example.com",
            SecretString::new("secret-token".to_string()),
            false,
        )
    }

    fn handler(processor: Arc<MockPaymentProcessor>) -> QueryTransactionHandler {
        let store = Arc::new(InMemoryGatewayConfigStore::with_gateway(GatewaySettings {
            module_name: "voguepay".to_string(),
            display_name: "VoguePay".to_string(),
            credentials: credentials(),
            developer_code: None,
            system_url: "https://billing.example.com/".to_string(),
            callback_url: None,
        }));
        QueryTransactionHandler::new(store, processor, "voguepay")
    }

    fn query() -> QueryTransactionQuery {
        QueryTransactionQuery {
            transaction_id: TransactionId::new("tx-77").unwrap(),
        }
    }

    fn reply(transaction_id: &str, hash: &str) -> Vec<u8> {
        format!(
            concat!(
                r#"ok:{{"transaction_id":"{}","merchant_id":"5501","merchant_ref":"42##7","#,
                r#""status":"Approved","total_amount":"150.00","charges":"2.50","#,
                r#""salt":"abc","hash":"{}"}}"#
            ),
            transaction_id, hash
        )
        .into_bytes()
    }

    #[tokio::test]
    async fn returns_verified_report() {
        let processor = Arc::new(MockPaymentProcessor::new());
        processor.respond_with(reply("tx-77", &response_hash(&credentials(), "abc")));

        let signed = handler(processor.clone()).handle(query()).await.unwrap();

        assert_eq!(signed.transaction.status, TransactionStatus::Approved);
        assert_eq!(signed.transaction.total_amount, dec!(150.00));
        assert_eq!(signed.transaction.charges, Some(dec!(2.50)));
        assert_eq!(processor.submitted()[0].operation(), Operation::Query);
    }

    #[tokio::test]
    async fn rejects_reply_with_bad_hash() {
        let processor = Arc::new(MockPaymentProcessor::new());
        processor.respond_with(reply("tx-77", "WRONG"));

        let result = handler(processor).handle(query()).await;

        assert!(matches!(result, Err(GatewayError::IntegrityFailure)));
    }

    #[tokio::test]
    async fn rejects_reply_for_other_transaction() {
        let processor = Arc::new(MockPaymentProcessor::new());
        processor.respond_with(reply("tx-other", &response_hash(&credentials(), "abc")));

        let result = handler(processor).handle(query()).await;

        assert!(matches!(result, Err(GatewayError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn short_body_is_malformed() {
        let processor = Arc::new(MockPaymentProcessor::new());
        processor.respond_with(b"{}".to_vec());

        let result = handler(processor).handle(query()).await;

        assert!(matches!(result, Err(GatewayError::MalformedResponse(_))));
    }
}
