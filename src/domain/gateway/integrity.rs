//! Integrity hashes for the VoguePay command API.
//!
//! The processor uses two SHA-512 constructions, both hex encoded:
//!
//! - request:  `sha512(token + task + account_email + ref)`
//! - response: `sha512(token + account_email + salt)`
//!
//! Every inbound payload (command API reply, notification, redirect) is
//! verified with the response construction.

use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

use super::credentials::MerchantCredentials;
use super::errors::GatewayError;
use super::request::Operation;

/// Largest random suffix appended to a nonce reference.
const MAX_NONCE_SUFFIX: u32 = 9_999_999;

/// Single-use reference that binds a request hash to one exchange.
///
/// Unix seconds followed by a random suffix, so two requests issued in the
/// same second still differ with overwhelming probability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonceReference(String);

impl NonceReference {
    /// Generates a fresh reference from the current time.
    pub fn generate() -> Self {
        let suffix = rand::thread_rng().gen_range(0..=MAX_NONCE_SUFFIX);
        Self::from_parts(Utc::now().timestamp(), suffix)
    }

    /// Builds a reference from explicit parts.
    pub fn from_parts(unix_secs: i64, suffix: u32) -> Self {
        Self(format!("{}{}", unix_secs, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonceReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the hash sent with an outbound request.
pub fn request_hash(
    credentials: &MerchantCredentials,
    operation: Operation,
    nonce: &NonceReference,
) -> String {
    sha512_hex(&[
        credentials.token_str(),
        operation.as_str(),
        credentials.account_email(),
        nonce.as_str(),
    ])
}

/// Computes the hash the processor must attach to a payload carrying `salt`.
pub fn response_hash(credentials: &MerchantCredentials, salt: &str) -> String {
    sha512_hex(&[credentials.token_str(), credentials.account_email(), salt])
}

/// Verifies a processor hash against the expected response hash.
///
/// # Errors
///
/// Returns `GatewayError::IntegrityFailure` when the hashes differ. Callers
/// must not trust any field of the payload in that case.
pub fn verify_response(
    credentials: &MerchantCredentials,
    salt: &str,
    received_hash: &str,
) -> Result<(), GatewayError> {
    let expected = response_hash(credentials, salt);
    if constant_time_compare(expected.as_bytes(), received_hash.as_bytes()) {
        Ok(())
    } else {
        tracing::warn!(salt = %salt, "Processor hash does not match expected value");
        Err(GatewayError::IntegrityFailure)
    }
}

fn sha512_hex(parts: &[&str]) -> String {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use secrecy::SecretString;

    fn credentials() -> MerchantCredentials {
        MerchantCredentials::new(
            "demo",
            "merchant@example.com",
            SecretString::new("command-token".to_string()),
            true,
        )
    }

    // ══════════════════════════════════════════════════════════════
    // Hash Construction Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn request_hash_matches_concatenated_digest() {
        let creds = credentials();
        let nonce = NonceReference::from_parts(1_700_000_000, 42);

        let expected = hex::encode(Sha512::digest(
            "command-tokencardmerchant@example.com170000000042".as_bytes(),
        ));

        assert_eq!(request_hash(&creds, Operation::Card, &nonce), expected);
    }

    #[test]
    fn request_hash_depends_on_operation() {
        let creds = credentials();
        let nonce = NonceReference::from_parts(1_700_000_000, 42);

        assert_ne!(
            request_hash(&creds, Operation::Card, &nonce),
            request_hash(&creds, Operation::Query, &nonce)
        );
    }

    #[test]
    fn response_hash_is_lowercase_hex_of_512_bits() {
        let hash = response_hash(&credentials(), "abc");
        assert_eq!(hash.len(), 128);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn response_hash_omits_operation() {
        let expected = hex::encode(Sha512::digest(
            "command-tokenmerchant@example.comabc".as_bytes(),
        ));
        assert_eq!(response_hash(&credentials(), "abc"), expected);
    }

    // ══════════════════════════════════════════════════════════════
    // Verification Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_accepts_matching_hash() {
        let creds = credentials();
        let hash = response_hash(&creds, "salt-1");

        assert!(verify_response(&creds, "salt-1", &hash).is_ok());
    }

    #[test]
    fn verify_rejects_wrong_hash() {
        let result = verify_response(&credentials(), "salt-1", "WRONG");
        assert!(matches!(result, Err(GatewayError::IntegrityFailure)));
    }

    #[test]
    fn verify_rejects_tampered_salt() {
        let creds = credentials();
        let hash = response_hash(&creds, "salt-1");

        let result = verify_response(&creds, "salt-2", &hash);

        assert!(matches!(result, Err(GatewayError::IntegrityFailure)));
    }

    #[test]
    fn verify_rejects_uppercase_variant() {
        let creds = credentials();
        let hash = response_hash(&creds, "salt-1").to_uppercase();

        assert!(verify_response(&creds, "salt-1", &hash).is_err());
    }

    #[test]
    fn verify_rejects_hash_from_other_token() {
        let other = MerchantCredentials::new(
            "demo",
            "merchant@example.com",
            SecretString::new("another-token".to_string()),
            true,
        );
        let hash = response_hash(&other, "salt-1");

        assert!(verify_response(&credentials(), "salt-1", &hash).is_err());
    }

    // ══════════════════════════════════════════════════════════════
    // Nonce Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn nonce_starts_with_unix_seconds() {
        let before = Utc::now().timestamp().to_string();
        let nonce = NonceReference::generate();
        assert!(nonce.as_str().starts_with(&before[..8]));
        assert!(nonce.as_str().chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn consecutive_nonces_differ() {
        let nonces: std::collections::HashSet<String> = (0..50)
            .map(|_| NonceReference::generate().as_str().to_string())
            .collect();
        assert!(nonces.len() > 1);
    }

    // ══════════════════════════════════════════════════════════════
    // Constant Time Comparison Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn constant_time_compare_different_lengths() {
        assert!(!constant_time_compare(b"abc", b"abcd"));
    }

    #[test]
    fn constant_time_compare_equal_values() {
        assert!(constant_time_compare(b"abcd", b"abcd"));
    }

    proptest! {
        #[test]
        fn request_hash_is_deterministic(
            token in "[a-zA-Z0-9]{1,40}",
            email in "[a-z]{1,10}@[a-z]{1,10}\\.com",
            secs in 0i64..4_000_000_000,
            suffix in 0u32..=MAX_NONCE_SUFFIX,
        ) {
            let creds = MerchantCredentials::new(
                "m", email, SecretString::new(token), false,
            );
            let nonce = NonceReference::from_parts(secs, suffix);
            let first = request_hash(&creds, Operation::Query, &nonce);
            let second = request_hash(&creds, Operation::Query, &nonce.clone());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn response_hash_round_trips_through_verification(salt in ".{0,64}") {
            let creds = credentials();
            let hash = response_hash(&creds, &salt);
            prop_assert!(verify_response(&creds, &salt, &hash).is_ok());
        }
    }
}
