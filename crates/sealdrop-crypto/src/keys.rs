//! Access keys: the single-use secret handed back to the uploader
//!
//! An access key is 18 random bytes rendered as URL-safe base64 (24 chars,
//! no padding). The *encoded string* is the key material fed to the KDF, so
//! the key a user pastes into a URL is byte-for-byte what the suite sees.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroize;

/// Random bytes behind each generated key.
pub const ACCESS_KEY_ENTROPY: usize = 18;

/// A caller-facing key. Never stored server-side; redacted in `Debug`.
#[derive(Debug)]
pub struct AccessKey {
    encoded: SecretString,
}

impl AccessKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        let mut raw = [0u8; ACCESS_KEY_ENTROPY];
        rand::thread_rng().fill_bytes(&mut raw);
        let encoded = URL_SAFE.encode(raw);
        raw.zeroize();
        Self {
            encoded: SecretString::from(encoded),
        }
    }

    /// Wrap a key received at the API boundary (query parameter, CLI argument).
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self {
            encoded: SecretString::from(encoded.into()),
        }
    }

    /// The key as the suite consumes it.
    pub fn as_bytes(&self) -> &[u8] {
        self.encoded.expose_secret().as_bytes()
    }

    /// The key as it appears in a URL.
    pub fn expose(&self) -> &str {
        self.encoded.expose_secret()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_key_shape() {
        let key = AccessKey::generate();
        assert_eq!(key.expose().len(), 24, "18 bytes encode to 24 base64 chars");
        assert!(key
            .expose()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_generated_keys_differ() {
        let k1 = AccessKey::generate();
        let k2 = AccessKey::generate();
        assert_ne!(k1.expose(), k2.expose(), "random keys must differ");
    }

    #[test]
    fn test_generated_key_decodes_to_entropy() {
        let key = AccessKey::generate();
        let raw = URL_SAFE.decode(key.expose()).unwrap();
        assert_eq!(raw.len(), ACCESS_KEY_ENTROPY);
    }

    #[test]
    fn test_from_encoded_bytes() {
        let key = AccessKey::from_encoded("abc-DEF_123");
        assert_eq!(key.as_bytes(), b"abc-DEF_123");
    }

    #[test]
    fn test_debug_redacted() {
        let key = AccessKey::from_encoded("super-secret");
        assert!(!format!("{key:?}").contains("super-secret"));
    }
}
