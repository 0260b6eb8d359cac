//! Request signing utilities.
//!
//! Private MX endpoints authenticate with four headers:
//!
//! | Header | Value |
//! |---|---|
//! | `MX-API-KEY` | API key |
//! | `MX-API-USER` | API user id |
//! | `MX-NONCE` | strictly increasing integer |
//! | `MX-SIGNATURE` | `hex(HMAC-SHA256(secret, nonce + key + user))` |

use hmac::{Hmac, Mac};
use mx_core::error::ConfigError;
use mx_core::traits::Credentials;
use mx_core::types::Timestamp;
use sha2::Sha256;
use std::sync::atomic::{AtomicU64, Ordering};

type HmacSha256 = Hmac<Sha256>;

/// API key header.
pub const HEADER_API_KEY: &str = "MX-API-KEY";
/// API user header.
pub const HEADER_API_USER: &str = "MX-API-USER";
/// Signature header.
pub const HEADER_SIGNATURE: &str = "MX-SIGNATURE";
/// Nonce header.
pub const HEADER_NONCE: &str = "MX-NONCE";

/// Request signer for MX API authentication.
#[derive(Clone)]
pub struct RequestSigner {
    api_key: String,
    api_user: String,
    secret: String,
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("api_key", &self.api_key)
            .field("api_user", &self.api_user)
            .finish_non_exhaustive()
    }
}

impl RequestSigner {
    /// Creates a new request signer.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        api_user: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_user: api_user.into(),
            secret: secret.into(),
        }
    }

    /// Creates a signer from credentials.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if the key, user or secret is
    /// absent or empty.
    pub fn from_credentials(credentials: &Credentials) -> Result<Self, ConfigError> {
        let (api_key, api_user, secret) = credentials.require()?;
        Ok(Self::new(api_key, api_user, secret))
    }

    /// Signs a message using HMAC-SHA256 and returns the lowercase hex signature.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the secret cannot key the MAC.
    pub fn sign_hmac_sha256_hex(&self, message: &str) -> Result<String, ConfigError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes()).map_err(|e| {
            ConfigError::invalid_value("api_secret", format!("Failed to create HMAC: {e}"))
        })?;

        mac.update(message.as_bytes());
        let result = mac.finalize();
        Ok(hex::encode(result.into_bytes()))
    }

    /// Computes the signature for `nonce`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if signing fails.
    pub fn sign(&self, nonce: u64) -> Result<String, ConfigError> {
        let message = format!("{nonce}{}{}", self.api_key, self.api_user);
        self.sign_hmac_sha256_hex(&message)
    }

    /// Returns the four authentication headers for `nonce`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if signing fails.
    pub fn auth_headers(&self, nonce: u64) -> Result<Vec<(String, String)>, ConfigError> {
        let signature = self.sign(nonce)?;
        Ok(vec![
            (HEADER_API_KEY.to_string(), self.api_key.clone()),
            (HEADER_API_USER.to_string(), self.api_user.clone()),
            (HEADER_SIGNATURE.to_string(), signature),
            (HEADER_NONCE.to_string(), nonce.to_string()),
        ])
    }
}

/// Process-wide nonce source.
///
/// Values follow the wall clock in milliseconds but never repeat or go
/// backwards: each call returns `max(now, last + 1)`.
#[derive(Debug, Default)]
pub struct NonceGenerator {
    last: AtomicU64,
}

impl NonceGenerator {
    /// Creates a generator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Returns the next nonce.
    #[allow(clippy::cast_sign_loss)]
    pub fn next(&self) -> u64 {
        let now = Timestamp::now().as_millis().max(0) as u64;
        self.next_at(now)
    }

    fn next_at(&self, now: u64) -> u64 {
        let mut issued = now;
        // The closure always returns Some, so the update cannot fail.
        let _ = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                issued = now.max(last + 1);
                Some(issued)
            });
        issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_hmac_sha256_hex() {
        let signer = RequestSigner::new("key", "user", "secret");
        let signature = signer.sign_hmac_sha256_hex("message").unwrap();

        assert_eq!(
            signature,
            "8b5f48702995c1598c573db1e21866a9b825d4a794d169d7060a03605796360b"
        );
    }

    #[test]
    fn test_signature_covers_nonce_key_and_user() {
        let signer = RequestSigner::new("abc", "42", "secret");
        assert_eq!(
            signer.sign(1_700_000_000_000).unwrap(),
            signer.sign_hmac_sha256_hex("1700000000000abc42").unwrap()
        );
    }

    #[test]
    fn test_signing_is_deterministic() {
        let signer = RequestSigner::new("abc", "42", "secret");
        assert_eq!(signer.sign(7).unwrap(), signer.sign(7).unwrap());
        assert_ne!(signer.sign(7).unwrap(), signer.sign(8).unwrap());
    }

    #[test]
    fn test_signature_is_lowercase_hex() {
        let signature = RequestSigner::new("k", "u", "s").sign(1).unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_auth_headers() {
        let signer = RequestSigner::new("abc", "42", "secret");
        let headers = signer.auth_headers(5).unwrap();
        let names: Vec<_> = headers.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            vec![HEADER_API_KEY, HEADER_API_USER, HEADER_SIGNATURE, HEADER_NONCE]
        );
        assert_eq!(headers[3].1, "5");
        assert_eq!(headers[2].1, signer.sign(5).unwrap());
    }

    #[test]
    fn test_from_credentials_requires_all_fields() {
        let missing = Credentials::default();
        assert!(matches!(
            RequestSigner::from_credentials(&missing),
            Err(ConfigError::MissingField { .. })
        ));
        assert!(RequestSigner::from_credentials(&Credentials::new("k", "u", "s")).is_ok());
    }

    #[test]
    fn test_debug_hides_secret() {
        let signer = RequestSigner::new("k", "u", "hunter2");
        assert!(!format!("{signer:?}").contains("hunter2"));
    }

    #[test]
    fn test_nonce_strictly_increases_on_frozen_clock() {
        let generator = NonceGenerator::new();
        assert_eq!(generator.next_at(100), 100);
        assert_eq!(generator.next_at(100), 101);
        assert_eq!(generator.next_at(50), 102);
        assert_eq!(generator.next_at(500), 500);
    }

    #[test]
    fn test_nonce_unique_across_threads() {
        let generator = Arc::new(NonceGenerator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let generator = Arc::clone(&generator);
                std::thread::spawn(move || (0..500).map(|_| generator.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            let nonces = handle.join().unwrap();
            assert!(nonces.windows(2).all(|w| w[0] < w[1]));
            for nonce in nonces {
                assert!(seen.insert(nonce), "duplicate nonce {nonce}");
            }
        }
        assert_eq!(seen.len(), 4000);
    }
}
