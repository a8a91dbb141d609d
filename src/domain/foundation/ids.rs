//! Strongly-typed identifier value objects.
//!
//! Invoice and client identifiers are the host's numeric keys. Transaction
//! identifiers are issued by the processor and are opaque strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Identifier of an invoice in the host billing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(u64);

impl InvoiceId {
    /// Wraps a raw host invoice number.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw invoice number.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InvoiceId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_numeric_id("invoice_id", s).map(Self)
    }
}

/// Identifier of a client (customer) record in the host billing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(u64);

impl ClientId {
    /// Wraps a raw host client number.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw client number.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClientId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_numeric_id("client_id", s).map(Self)
    }
}

/// Processor-issued transaction identifier.
///
/// This is the idempotency key for settlements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId(String);

impl TransactionId {
    /// Creates a transaction id, rejecting blank values.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("transaction_id"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TransactionId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TransactionId> for String {
    fn from(id: TransactionId) -> Self {
        id.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn parse_numeric_id(field: &str, raw: &str) -> Result<u64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    raw.parse::<u64>()
        .map_err(|_| ValidationError::invalid_format(field, format!("'{}' is not a number", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_id_parses_digits() {
        let id: InvoiceId = "123".parse().unwrap();
        assert_eq!(id.as_u64(), 123);
        assert_eq!(id.to_string(), "123");
    }

    #[test]
    fn invoice_id_trims_whitespace() {
        let id: InvoiceId = " 42 ".parse().unwrap();
        assert_eq!(id, InvoiceId::new(42));
    }

    #[test]
    fn invoice_id_rejects_empty() {
        let result = "".parse::<InvoiceId>();
        assert!(matches!(result, Err(ValidationError::EmptyField { .. })));
    }

    #[test]
    fn client_id_rejects_non_numeric() {
        let result = "abc".parse::<ClientId>();
        assert!(matches!(result, Err(ValidationError::InvalidFormat { .. })));
    }

    #[test]
    fn transaction_id_rejects_blank() {
        assert!(TransactionId::new("   ").is_err());
    }

    #[test]
    fn transaction_id_deserializes_from_string() {
        let id: TransactionId = serde_json::from_str("\"5c6d2a1b\"").unwrap();
        assert_eq!(id.as_str(), "5c6d2a1b");
    }

    #[test]
    fn transaction_id_deserialize_rejects_empty() {
        let result = serde_json::from_str::<TransactionId>("\"\"");
        assert!(result.is_err());
    }
}
