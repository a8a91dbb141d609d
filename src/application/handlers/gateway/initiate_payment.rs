//! InitiatePaymentHandler - Command handler for starting a card payment.

use std::sync::Arc;

use crate::domain::gateway::{
    decode_reply, verify_response, CardDetails, CardReply, Cardholder, GatewayError,
    NonceReference, OutboundRequest, PaymentDetails, ReturnUrls,
};
use crate::ports::{GatewayConfigStore, GatewaySettings, PaymentProcessor};

/// Message shown when the processor cannot be reached or its reply is untrusted.
pub const GENERIC_FAILURE_MESSAGE: &str = "Unable to process payment request. Please try again later. If the issue persists, kindly contact administrator.";

/// Command to start a card payment for an invoice.
#[derive(Debug, Clone)]
pub struct InitiatePaymentCommand {
    pub payment: PaymentDetails,
    pub cardholder: Cardholder,
    pub card: CardDetails,
    /// Billing site URL the request originates from.
    pub origin_url: String,
    /// True when the customer is on an HTTPS connection.
    pub secure_transport: bool,
    /// Label of the submit button on the payment form.
    pub pay_now_label: String,
}

/// What the host shows the customer after initiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentInitiation {
    /// Form posting the customer to the processor's payment page.
    AutoSubmitForm { action: String, submit_label: String },
    /// HTTP redirect to the processor's payment page.
    Redirect { url: String },
    /// Nothing was charged; show the message.
    Failure { message: String },
}

impl PaymentInitiation {
    /// HTML fragment for the host's invoice page. Redirects render nothing.
    pub fn render_html(&self) -> String {
        match self {
            PaymentInitiation::AutoSubmitForm {
                action,
                submit_label,
            } => format!(
                concat!(
                    r#"<form method="post" action="{}">"#,
                    r#"<input type="hidden" name="voguepay" value="" />"#,
                    r#"<input type="submit" value="{}" />"#,
                    "</form>"
                ),
                escape_html(action),
                escape_html(submit_label)
            ),
            PaymentInitiation::Redirect { .. } => String::new(),
            PaymentInitiation::Failure { message } => format!(
                concat!(
                    "<div class='alert alert-danger text-center' role='alert'>",
                    "<strong><i class='fas fa-times-circle'></i> {}</strong>",
                    "</div>"
                ),
                escape_html(message)
            ),
        }
    }
}

/// Handler for the outbound `card` request.
///
/// Transport, integrity and processor failures become
/// [`PaymentInitiation::Failure`]; only configuration and host failures are
/// returned as errors.
pub struct InitiatePaymentHandler {
    config_store: Arc<dyn GatewayConfigStore>,
    processor: Arc<dyn PaymentProcessor>,
    module_name: String,
}

impl InitiatePaymentHandler {
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

    pub async fn handle(
        &self,
        cmd: InitiatePaymentCommand,
    ) -> Result<PaymentInitiation, GatewayError> {
        let settings = self
            .config_store
            .active_gateway(&self.module_name)
            .await?
            .ok_or(GatewayError::ModuleInactive)?;

        let request = build_card_request(&settings, &cmd);
        let invoice_id = cmd.payment.invoice_id;

        let reply = match self.submit(&settings, &request).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(
                    invoice_id = %invoice_id,
                    reference = %request.reference(),
                    error = %e,
                    "Card request failed"
                );
                return Ok(PaymentInitiation::Failure {
                    message: GENERIC_FAILURE_MESSAGE.to_string(),
                });
            }
        };

        if !reply.is_ok() {
            tracing::warn!(
                invoice_id = %invoice_id,
                status = %reply.status,
                "Processor declined card request"
            );
            return Ok(PaymentInitiation::Failure {
                message: format!(
                    "Unable to process payment request. Error received - {} - {}",
                    reply.message.as_deref().unwrap_or_default(),
                    reply.response.as_deref().unwrap_or_default()
                ),
            });
        }

        let Some(url) = reply.redirect_url.filter(|url| !url.is_empty()) else {
            tracing::error!(invoice_id = %invoice_id, "Processor reply has no redirect_url");
            return Ok(PaymentInitiation::Failure {
                message: GENERIC_FAILURE_MESSAGE.to_string(),
            });
        };

        tracing::info!(invoice_id = %invoice_id, "Card request accepted by processor");

        if cmd.secure_transport {
            Ok(PaymentInitiation::AutoSubmitForm {
                action: url,
                submit_label: cmd.pay_now_label,
            })
        } else {
            Ok(PaymentInitiation::Redirect { url })
        }
    }

    async fn submit(
        &self,
        settings: &GatewaySettings,
        request: &OutboundRequest,
    ) -> Result<CardReply, GatewayError> {
        let body = self.processor.submit(request).await?;
        let reply: CardReply = decode_reply(&body)?;
        verify_response(&settings.credentials, &reply.salt, &reply.hash)?;
        Ok(reply)
    }
}

fn build_card_request(settings: &GatewaySettings, cmd: &InitiatePaymentCommand) -> OutboundRequest {
    let urls = ReturnUrls {
        origin: cmd.origin_url.clone(),
        notification: settings.notification_endpoint(),
        redirect: settings.redirect_endpoint(),
    };

    OutboundRequest::card(
        &settings.credentials,
        &NonceReference::generate(),
        &cmd.payment,
        &cmd.cardholder,
        &cmd.card,
        &urls,
        settings.developer_code.as_deref().unwrap_or_default(),
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryGatewayConfigStore;
    use crate::adapters::voguepay::MockPaymentProcessor;
    use crate::domain::foundation::{ClientId, InvoiceId};
    use crate::domain::gateway::{response_hash, CardExpiry, MerchantCredentials, Operation};
    use rust_decimal_macros::dec;
    use secrecy::SecretString;

    fn credentials() -> MerchantCredentials {
        MerchantCredentials::new(
            "demo",
            "shop@example.com",
            SecretString::new("secret-token".to_string()),
            true,
        )
    }

    fn settings() -> GatewaySettings {
        GatewaySettings {
            module_name: "voguepay".to_string(),
            display_name: "VoguePay".to_string(),
            credentials: credentials(),
            developer_code: Some("dev-1".to_string()),
            system_url: "https://billing.example.com/".to_string(),
            callback_url: None,
        }
    }

    fn command(secure: bool) -> InitiatePaymentCommand {
        InitiatePaymentCommand {
            payment: PaymentDetails {
                invoice_id: InvoiceId::new(42),
                client_id: ClientId::new(7),
                amount: dec!(150.00),
                currency: "NGN".to_string(),
                description: "Invoice #42".to_string(),
            },
            cardholder: Cardholder {
                first_name: "Ada".to_string(),
                last_name: "Obi".to_string(),
                email: "ada@example.com".to_string(),
                ..Cardholder::default()
            },
            card: CardDetails {
                number: SecretString::new("5123450000000008".to_string()),
                expiry: CardExpiry::parse("0530").unwrap(),
                cvv: Some(SecretString::new("100".to_string())),
            },
            origin_url: "https://billing.example.com/".to_string(),
            secure_transport: secure,
            pay_now_label: "Pay Now".to_string(),
        }
    }

    fn signed_reply(status: &str, extra: &str) -> Vec<u8> {
        let salt = "s4lt";
        let hash = response_hash(&credentials(), salt);
        format!(
            r#"xx:{{"status":"{}","salt":"{}","hash":"{}"{}}}"#,
            status, salt, hash, extra
        )
        .into_bytes()
    }

    fn handler(processor: Arc<MockPaymentProcessor>) -> InitiatePaymentHandler {
        let store = Arc::new(InMemoryGatewayConfigStore::with_gateway(settings()));
        InitiatePaymentHandler::new(store, processor, "voguepay")
    }

    // ══════════════════════════════════════════════════════════════
    // Success Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn secure_transport_renders_form() {
        let processor = Arc::new(MockPaymentProcessor::new());
        processor.respond_with(signed_reply(
            "OK",
            r#","redirect_url":"https://pay.example.com/x""#,
        ));

        let result = handler(processor.clone()).handle(command(true)).await.unwrap();

        assert_eq!(
            result,
            PaymentInitiation::AutoSubmitForm {
                action: "https://pay.example.com/x".to_string(),
                submit_label: "Pay Now".to_string(),
            }
        );
        assert!(result
            .render_html()
            .contains(r#"action="https://pay.example.com/x""#));
    }

    #[tokio::test]
    async fn plain_transport_redirects() {
        let processor = Arc::new(MockPaymentProcessor::new());
        processor.respond_with(signed_reply(
            "OK",
            r#","redirect_url":"https://pay.example.com/x""#,
        ));

        let result = handler(processor).handle(command(false)).await.unwrap();

        assert_eq!(
            result,
            PaymentInitiation::Redirect {
                url: "https://pay.example.com/x".to_string()
            }
        );
        assert!(result.render_html().is_empty());
    }

    #[tokio::test]
    async fn submits_signed_card_request() {
        let processor = Arc::new(MockPaymentProcessor::new());
        processor.respond_with(signed_reply("OK", r#","redirect_url":"https://p/x""#));

        handler(processor.clone()).handle(command(false)).await.unwrap();

        let submitted = processor.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].operation(), Operation::Card);

        let json: serde_json::Value = serde_json::from_str(&submitted[0].to_json().unwrap()).unwrap();
        assert_eq!(json["merchant_ref"], "42##7");
        assert_eq!(json["response_url"], "https://billing.example.com/callback");
        assert_eq!(
            json["redirect_url"],
            "https://billing.example.com/callback/redirect"
        );
        assert_eq!(json["developer_code"], "dev-1");
    }

    // ══════════════════════════════════════════════════════════════
    // Failure Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn tampered_reply_hash_fails_closed() {
        let processor = Arc::new(MockPaymentProcessor::new());
        processor.respond_with(
            br#"abc{"status":"OK","salt":"s","hash":"WRONG","redirect_url":"https://p/x"}"#.to_vec(),
        );

        let result = handler(processor).handle(command(true)).await.unwrap();

        assert_eq!(
            result,
            PaymentInitiation::Failure {
                message: GENERIC_FAILURE_MESSAGE.to_string()
            }
        );
    }

    #[tokio::test]
    async fn transport_error_shows_generic_message() {
        let processor = Arc::new(MockPaymentProcessor::new());
        processor.fail_with(GatewayError::Transport("connection refused".to_string()));

        let result = handler(processor).handle(command(true)).await.unwrap();

        assert!(matches!(result, PaymentInitiation::Failure { message } if message == GENERIC_FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn non_ok_status_includes_processor_message() {
        let processor = Arc::new(MockPaymentProcessor::new());
        processor.respond_with(signed_reply(
            "ERROR",
            r#","message":"Invalid card","response":"C01""#,
        ));

        let result = handler(processor).handle(command(true)).await.unwrap();

        assert_eq!(
            result,
            PaymentInitiation::Failure {
                message: "Unable to process payment request. Error received - Invalid card - C01"
                    .to_string()
            }
        );
    }

    #[tokio::test]
    async fn inactive_module_is_an_error() {
        let processor = Arc::new(MockPaymentProcessor::new());
        let store = Arc::new(InMemoryGatewayConfigStore::new());
        let handler = InitiatePaymentHandler::new(store, processor.clone(), "voguepay");

        let result = handler.handle(command(true)).await;

        assert!(matches!(result, Err(GatewayError::ModuleInactive)));
        assert!(processor.submitted().is_empty());
    }

    #[test]
    fn failure_fragment_escapes_message() {
        let html = PaymentInitiation::Failure {
            message: "<script>".to_string(),
        }
        .render_html();

        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("role='alert'"));
    }
}
