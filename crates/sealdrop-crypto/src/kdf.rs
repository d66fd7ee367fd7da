//! Key derivation: access key + salt → PBKDF2-HMAC-SHA256 derived key

use sha2::Sha256;
use zeroize::Zeroize;

use crate::error::{CryptoError, CryptoResult};

/// Derived key lengths the KDF accepts.
pub const SUPPORTED_KEY_LENGTHS: &[usize] = &[16, 32, 64];

/// PBKDF2 parameters, validated on construction so no derivation work is
/// ever started with an unsupported length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    key_length: usize,
    iterations: u32,
}

impl KdfParams {
    pub fn new(key_length: usize, iterations: u32) -> CryptoResult<Self> {
        if !SUPPORTED_KEY_LENGTHS.contains(&key_length) {
            return Err(CryptoError::InvalidKeyLength {
                requested: key_length,
                supported: SUPPORTED_KEY_LENGTHS,
            });
        }
        if iterations == 0 {
            return Err(CryptoError::InvalidIterations);
        }
        Ok(Self {
            key_length,
            iterations,
        })
    }

    pub fn key_length(&self) -> usize {
        self.key_length
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

/// Output of the KDF. The first half keys the cipher, the second half keys
/// the MAC; the two never overlap.
///
/// Zeroized on drop.
pub struct DerivedKey {
    bytes: Vec<u8>,
}

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn cipher_key(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() / 2]
    }

    pub fn mac_key(&self) -> &[u8] {
        &self.bytes[self.bytes.len() / 2..]
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive `params.key_length()` bytes from `key` and `salt`.
///
/// Deterministic: the same (key, salt, params) always yields the same bytes.
/// Intentionally slow; the iteration count is the only tuning knob.
pub fn derive_key(params: &KdfParams, key: &[u8], salt: &[u8]) -> DerivedKey {
    let mut bytes = vec![0u8; params.key_length];
    pbkdf2::pbkdf2_hmac::<Sha256>(key, salt, params.iterations, &mut bytes);
    DerivedKey { bytes }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low iteration count keeps these tests fast; suites always use ITERATIONS.
    fn fast_params() -> KdfParams {
        KdfParams::new(64, 1_000).unwrap()
    }

    #[test]
    fn test_kdf_deterministic() {
        let salt = [1u8; 16];
        let key1 = derive_key(&fast_params(), b"access-key", &salt);
        let key2 = derive_key(&fast_params(), b"access-key", &salt);

        assert_eq!(key1.as_bytes(), key2.as_bytes(), "KDF must be deterministic");
    }

    #[test]
    fn test_kdf_different_keys() {
        let salt = [1u8; 16];
        let key1 = derive_key(&fast_params(), b"key-a", &salt);
        let key2 = derive_key(&fast_params(), b"key-b", &salt);

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_kdf_different_salts() {
        let key1 = derive_key(&fast_params(), b"same", &[1u8; 16]);
        let key2 = derive_key(&fast_params(), b"same", &[2u8; 16]);

        assert_ne!(
            key1.as_bytes(),
            key2.as_bytes(),
            "different salts must produce different keys"
        );
    }

    #[test]
    fn test_split_halves_do_not_overlap() {
        let dk = derive_key(&fast_params(), b"k", &[0u8; 16]);
        assert_eq!(dk.len(), 64);
        assert_eq!(dk.cipher_key().len(), 32);
        assert_eq!(dk.mac_key().len(), 32);
        assert_eq!(dk.cipher_key(), &dk.as_bytes()[..32]);
        assert_eq!(dk.mac_key(), &dk.as_bytes()[32..]);
    }

    #[test]
    fn test_known_vector() {
        // RFC 7914 §11 PBKDF2-HMAC-SHA256 test vector (c = 1, dkLen = 64)
        let params = KdfParams::new(64, 1).unwrap();
        let dk = derive_key(&params, b"passwd", b"salt");
        assert_eq!(
            &dk.as_bytes()[..8],
            &[0x55, 0xac, 0x04, 0x6e, 0x56, 0xe3, 0x08, 0x9f]
        );
    }

    #[test]
    fn test_unsupported_length_rejected() {
        let err = KdfParams::new(48, 1_000).unwrap_err();
        assert_eq!(
            err,
            CryptoError::InvalidKeyLength {
                requested: 48,
                supported: SUPPORTED_KEY_LENGTHS,
            }
        );
    }

    #[test]
    fn test_zero_iterations_rejected() {
        assert_eq!(
            KdfParams::new(32, 0).unwrap_err(),
            CryptoError::InvalidIterations
        );
    }

    #[test]
    fn test_debug_is_redacted() {
        let dk = derive_key(&fast_params(), b"k", &[0u8; 16]);
        let dbg = format!("{dk:?}");
        assert!(dbg.contains("REDACTED"));
    }
}
