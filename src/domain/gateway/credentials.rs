//! Merchant credentials for the VoguePay command API.

use secrecy::{ExposeSecret, SecretString};

/// Merchant id the processor reports for sandbox transactions.
pub const DEMO_MERCHANT_ID: &str = "demo";

/// Credentials identifying the merchant account.
///
/// Immutable for the lifetime of a configuration. The command token is the
/// shared secret mixed into every integrity hash.
#[derive(Clone)]
pub struct MerchantCredentials {
    merchant_id: String,
    account_email: String,
    command_token: SecretString,
    demo: bool,
}

impl MerchantCredentials {
    pub fn new(
        merchant_id: impl Into<String>,
        account_email: impl Into<String>,
        command_token: SecretString,
        demo: bool,
    ) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            account_email: account_email.into(),
            command_token,
            demo,
        }
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub fn account_email(&self) -> &str {
        &self.account_email
    }

    pub fn command_token(&self) -> &SecretString {
        &self.command_token
    }

    pub fn is_demo(&self) -> bool {
        self.demo
    }

    /// Whether a merchant id reported by the processor belongs to this account.
    ///
    /// In demo mode the processor answers with the `demo` sentinel instead of
    /// the configured id, so both are accepted.
    pub fn accepts_merchant(&self, reported: &str) -> bool {
        reported == self.merchant_id || (self.demo && reported == DEMO_MERCHANT_ID)
    }

    pub(crate) fn token_str(&self) -> &str {
        self.command_token.expose_secret()
    }
}

impl std::fmt::Debug for MerchantCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MerchantCredentials")
            .field("merchant_id", &self.merchant_id)
            .field("account_email", &self.account_email)
            .field("command_token", &"[REDACTED]")
            .field("demo", &self.demo)
            .finish()
    }
}
