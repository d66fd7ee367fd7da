//! AESv1 suite: headerless bundle with the salt as a trailer
//!
//! ```text
//! [16 bytes: nonce][N bytes: ciphertext][32 bytes: HMAC-SHA256 tag][16 bytes: salt]
//! ```

use super::{open, seal, Suite};
use crate::error::{CryptoError, CryptoResult};
use crate::{NONCE_SIZE, SALT_SIZE, TAG_SIZE};

/// AES-256-CTR + HMAC-SHA256, trailer layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct AesV1;

impl AesV1 {
    /// Smallest valid bundle: empty ciphertext.
    pub const MIN_BUNDLE_SIZE: usize = NONCE_SIZE + TAG_SIZE + SALT_SIZE;
}

impl Suite for AesV1 {
    const ID: u16 = 1;

    fn encrypt(key: &[u8], plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        let sealed = seal(key, plaintext)?;

        let mut bundle = Vec::with_capacity(sealed.authenticated.len() + TAG_SIZE + SALT_SIZE);
        bundle.extend_from_slice(&sealed.authenticated);
        bundle.extend_from_slice(&sealed.tag);
        bundle.extend_from_slice(&sealed.salt);
        Ok(bundle)
    }

    fn decrypt(key: &[u8], bundle: &[u8]) -> CryptoResult<Vec<u8>> {
        if bundle.len() < Self::MIN_BUNDLE_SIZE {
            return Err(CryptoError::Decryption);
        }

        let (rest, salt) = bundle.split_at(bundle.len() - SALT_SIZE);
        let (authenticated, tag) = rest.split_at(rest.len() - TAG_SIZE);
        open(key, salt, authenticated, tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unhex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    // Produced independently with a reference PBKDF2/AES-CTR/HMAC stack,
    // salt = 00..0f, nonce = 10..1f
    const KNOWN_BUNDLE: &str = "101112131415161718191a1b1c1d1e1f144ae8a059187353c9197a3a69fca7a3\
                                a331a19b996927168eaa635b415708c1ff5e62d05d8865a290f4b765fc319cab\
                                7df6b566000102030405060708090a0b0c0d0e0f";

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let bundle = AesV1::encrypt(b"k3y", b"hello, encrypted world!").unwrap();
        let plaintext = AesV1::decrypt(b"k3y", &bundle).unwrap();
        assert_eq!(plaintext, b"hello, encrypted world!");
    }

    #[test]
    fn test_bundle_size() {
        let bundle = AesV1::encrypt(b"k3y", &[0u8; 100]).unwrap();
        // nonce (16) + plaintext (100) + tag (32) + salt (16)
        assert_eq!(bundle.len(), 16 + 100 + 32 + 16);
    }

    #[test]
    fn test_known_bundle_decrypts() {
        let bundle = unhex(KNOWN_BUNDLE);
        let plaintext = AesV1::decrypt(b"test-access-key", &bundle).unwrap();
        assert_eq!(plaintext, b"hello, sealed world!");
    }

    #[test]
    fn test_known_bundle_wrong_key() {
        let bundle = unhex(KNOWN_BUNDLE);
        assert_eq!(
            AesV1::decrypt(b"test-access-kez", &bundle),
            Err(CryptoError::Decryption)
        );
    }

    #[test]
    fn test_truncated_bundle_fails_closed() {
        assert_eq!(
            AesV1::decrypt(b"k", &[0u8; AesV1::MIN_BUNDLE_SIZE - 1]),
            Err(CryptoError::Decryption)
        );
        assert_eq!(AesV1::decrypt(b"k", &[]), Err(CryptoError::Decryption));
    }
}
