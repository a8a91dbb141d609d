//! Merchant reference: the invoice/client pair round-tripped through the
//! processor in the `merchant_ref` field.
//!
//! Encoding is `<invoice_id>##<client_id>`. Anything else is rejected rather
//! than guessed at.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ClientId, InvoiceId, ValidationError};

/// Separator between the invoice and client identifiers.
pub const REFERENCE_DELIMITER: &str = "##";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MerchantReference {
    pub invoice_id: InvoiceId,
    pub client_id: ClientId,
}

impl MerchantReference {
    pub fn new(invoice_id: InvoiceId, client_id: ClientId) -> Self {
        Self {
            invoice_id,
            client_id,
        }
    }

    /// Parses an encoded reference.
    ///
    /// # Errors
    ///
    /// `ValidationError::InvalidFormat` unless the input splits into exactly
    /// two numeric parts on the delimiter.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let parts: Vec<&str> = raw.split(REFERENCE_DELIMITER).collect();
        let [invoice, client] = parts.as_slice() else {
            return Err(ValidationError::invalid_format(
                "merchant_ref",
                format!(
                    "expected <invoice>{}<client>, got '{}'",
                    REFERENCE_DELIMITER, raw
                ),
            ));
        };

        Ok(Self {
            invoice_id: invoice.parse()?,
            client_id: client.parse()?,
        })
    }
}

impl fmt::Display for MerchantReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.invoice_id, REFERENCE_DELIMITER, self.client_id)
    }
}

impl FromStr for MerchantReference {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MerchantReference {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MerchantReference> for String {
    fn from(reference: MerchantReference) -> Self {
        reference.to_string()
    }
}
