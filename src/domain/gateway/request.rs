//! Outbound request types for the VoguePay command API.
//!
//! A request is serialized to JSON and posted as the single form field
//! `json`. The integrity hash is computed when the request is built, so a
//! constructed `OutboundRequest` is always signed.

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};

use crate::domain::foundation::{ClientId, InvoiceId, TransactionId, ValidationError};

use super::credentials::MerchantCredentials;
use super::integrity::{request_hash, NonceReference};
use super::merchant_ref::MerchantReference;

/// Command API task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Initiate a card payment.
    Card,
    /// Look up the state of an existing transaction.
    Query,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Card => "card",
            Operation::Query => "query",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card expiry split into the two-digit month and year the API expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardExpiry {
    month: String,
    year: String,
}

impl CardExpiry {
    /// Parses an `MMYY` (or `MM/YY`) expiry string.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let digits: String = raw.chars().filter(|c| *c != '/').collect();
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                "card_expiry",
                "expected MMYY",
            ));
        }

        let (month, year) = digits.split_at(2);
        match month.parse::<u8>() {
            Ok(1..=12) => Ok(Self {
                month: month.to_string(),
                year: year.to_string(),
            }),
            _ => Err(ValidationError::invalid_format(
                "card_expiry",
                format!("month '{}' out of range", month),
            )),
        }
    }

    pub fn month(&self) -> &str {
        &self.month
    }

    pub fn year(&self) -> &str {
        &self.year
    }
}

/// Card data entered by the customer.
///
/// The CVV is only present for cardholder-present attempts.
#[derive(Debug, Clone)]
pub struct CardDetails {
    pub number: SecretString,
    pub expiry: CardExpiry,
    pub cvv: Option<SecretString>,
}

/// Billing contact details of the cardholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cardholder {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub country: String,
    pub phone: String,
}

impl Cardholder {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Address lines joined the way the processor displays them.
    pub fn postal_address(&self) -> String {
        [
            self.address1.as_str(),
            self.address2.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.postcode.as_str(),
            self.country.as_str(),
        ]
        .join(", ")
    }
}

/// Invoice-side parameters of a card payment.
#[derive(Debug, Clone)]
pub struct PaymentDetails {
    pub invoice_id: InvoiceId,
    pub client_id: ClientId,
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
}

/// Where the processor sends the customer and its notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnUrls {
    /// The billing site the request originates from.
    pub origin: String,
    /// Endpoint for asynchronous notifications (`response_url`).
    pub notification: String,
    /// Endpoint the payer's browser returns to (`redirect_url`).
    pub redirect: String,
}

/// Signed request ready to be posted to the command API.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundRequest {
    task: Operation,
    merchant: String,
    #[serde(rename = "ref")]
    reference: String,
    hash: String,
    demo: bool,
    #[serde(flatten)]
    body: RequestBody,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum RequestBody {
    Card(Box<CardFields>),
    Query { transaction_id: TransactionId },
}

#[derive(Debug, Clone, Serialize)]
struct CardFields {
    total: Decimal,
    email: String,
    merchant_ref: MerchantReference,
    currency: String,
    memo: String,
    referral_url: String,
    response_url: String,
    redirect_url: String,
    card: WireCard,
    phone: String,
    address: String,
    developer_code: String,
}

#[derive(Debug, Clone, Serialize)]
struct WireCard {
    name: String,
    #[serde(serialize_with = "expose_secret")]
    pan: SecretString,
    month: String,
    year: String,
    #[serde(serialize_with = "expose_optional_secret", skip_serializing_if = "Option::is_none")]
    cvv: Option<SecretString>,
}

impl OutboundRequest {
    /// Builds a signed `card` request.
    pub fn card(
        credentials: &MerchantCredentials,
        nonce: &NonceReference,
        payment: &PaymentDetails,
        cardholder: &Cardholder,
        card: &CardDetails,
        urls: &ReturnUrls,
        developer_code: &str,
    ) -> Self {
        let fields = CardFields {
            total: payment.amount,
            email: cardholder.email.clone(),
            merchant_ref: MerchantReference::new(payment.invoice_id, payment.client_id),
            currency: payment.currency.clone(),
            memo: payment.description.clone(),
            referral_url: urls.origin.clone(),
            response_url: urls.notification.clone(),
            redirect_url: urls.redirect.clone(),
            card: WireCard {
                name: cardholder.full_name(),
                pan: card.number.clone(),
                month: card.expiry.month().to_string(),
                year: card.expiry.year().to_string(),
                cvv: card.cvv.clone(),
            },
            phone: cardholder.phone.clone(),
            address: cardholder.postal_address(),
            developer_code: developer_code.to_string(),
        };

        Self::signed(credentials, nonce, Operation::Card, RequestBody::Card(Box::new(fields)))
    }

    /// Builds a signed `query` request for one transaction.
    pub fn query(
        credentials: &MerchantCredentials,
        nonce: &NonceReference,
        transaction_id: &TransactionId,
    ) -> Self {
        Self::signed(
            credentials,
            nonce,
            Operation::Query,
            RequestBody::Query {
                transaction_id: transaction_id.clone(),
            },
        )
    }

    fn signed(
        credentials: &MerchantCredentials,
        nonce: &NonceReference,
        operation: Operation,
        body: RequestBody,
    ) -> Self {
        Self {
            task: operation,
            merchant: credentials.merchant_id().to_string(),
            reference: nonce.as_str().to_string(),
            hash: request_hash(credentials, operation, nonce),
            demo: credentials.is_demo(),
            body,
        }
    }

    pub fn operation(&self) -> Operation {
        self.task
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// JSON document posted as the `json` form field.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn expose_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn expose_optional_secret<S: Serializer>(
    secret: &Option<SecretString>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(secret) => serializer.serialize_str(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}
