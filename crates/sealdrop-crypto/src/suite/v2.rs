//! AESv2 suite: fixed 72-byte suite header in front of the ciphertext
//!
//! ```text
//! offset  size  field
//!      0     2  suite id (u16 BE) = 2
//!      2     6  reserved (zero)
//!      8    16  salt
//!     24    16  reserved (zero)
//!     40    32  HMAC-SHA256 tag
//!     72    16  nonce
//!     88     N  ciphertext
//! ```

use super::{open, seal, Suite};
use crate::error::{CryptoError, CryptoResult};
use crate::{NONCE_SIZE, SALT_SIZE, TAG_SIZE};

const SALT_OFFSET: usize = 8;
const TAG_OFFSET: usize = 40;

/// AES-256-CTR + HMAC-SHA256, header layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct AesV2;

impl AesV2 {
    pub const HEADER_SIZE: usize = 72;

    /// Smallest valid bundle: header plus nonce, empty ciphertext.
    pub const MIN_BUNDLE_SIZE: usize = Self::HEADER_SIZE + NONCE_SIZE;

    fn header(salt: &[u8; SALT_SIZE], tag: &[u8; TAG_SIZE]) -> [u8; Self::HEADER_SIZE] {
        let mut header = [0u8; Self::HEADER_SIZE];
        header[..2].copy_from_slice(&Self::ID.to_be_bytes());
        header[SALT_OFFSET..SALT_OFFSET + SALT_SIZE].copy_from_slice(salt);
        header[TAG_OFFSET..TAG_OFFSET + TAG_SIZE].copy_from_slice(tag);
        header
    }
}

impl Suite for AesV2 {
    const ID: u16 = 2;

    fn encrypt(key: &[u8], plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        let sealed = seal(key, plaintext)?;

        let mut bundle = Vec::with_capacity(Self::HEADER_SIZE + sealed.authenticated.len());
        bundle.extend_from_slice(&Self::header(&sealed.salt, &sealed.tag));
        bundle.extend_from_slice(&sealed.authenticated);
        Ok(bundle)
    }

    fn decrypt(key: &[u8], bundle: &[u8]) -> CryptoResult<Vec<u8>> {
        if bundle.len() < Self::MIN_BUNDLE_SIZE {
            return Err(CryptoError::Decryption);
        }

        let (header, authenticated) = bundle.split_at(Self::HEADER_SIZE);
        let reserved_clear = header[2..SALT_OFFSET]
            .iter()
            .chain(&header[SALT_OFFSET + SALT_SIZE..TAG_OFFSET])
            .all(|b| *b == 0);
        if header[..2] != Self::ID.to_be_bytes() || !reserved_clear {
            return Err(CryptoError::Decryption);
        }

        let salt = &header[SALT_OFFSET..SALT_OFFSET + SALT_SIZE];
        let tag = &header[TAG_OFFSET..TAG_OFFSET + TAG_SIZE];
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

    // Same key, salt, nonce and plaintext as the AESv1 known bundle
    const KNOWN_BUNDLE: &str = "0002000000000000000102030405060708090a0b0c0d0e0f0000000000000000\
                                0000000000000000996927168eaa635b415708c1ff5e62d05d8865a290f4b765\
                                fc319cab7df6b566101112131415161718191a1b1c1d1e1f144ae8a059187353\
                                c9197a3a69fca7a3a331a19b";

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let bundle = AesV2::encrypt(b"k3y", b"hello, encrypted world!").unwrap();
        let plaintext = AesV2::decrypt(b"k3y", &bundle).unwrap();
        assert_eq!(plaintext, b"hello, encrypted world!");
    }

    #[test]
    fn test_header_layout() {
        let bundle = AesV2::encrypt(b"k3y", b"abc").unwrap();
        assert_eq!(bundle.len(), 72 + 16 + 3);
        assert_eq!(&bundle[..2], &[0x00, 0x02]);
        assert!(bundle[2..8].iter().all(|b| *b == 0), "reserved bytes must be zero");
        assert!(bundle[24..40].iter().all(|b| *b == 0), "reserved bytes must be zero");
    }

    #[test]
    fn test_known_bundle_decrypts() {
        let bundle = unhex(KNOWN_BUNDLE);
        let plaintext = AesV2::decrypt(b"test-access-key", &bundle).unwrap();
        assert_eq!(plaintext, b"hello, sealed world!");
    }

    #[test]
    fn test_wrong_suite_id_rejected() {
        let mut bundle = unhex(KNOWN_BUNDLE);
        bundle[1] = 0x01;
        assert_eq!(
            AesV2::decrypt(b"test-access-key", &bundle),
            Err(CryptoError::Decryption)
        );
    }

    #[test]
    fn test_nonzero_reserved_rejected() {
        let mut bundle = unhex(KNOWN_BUNDLE);
        bundle[30] = 0x80;
        assert_eq!(
            AesV2::decrypt(b"test-access-key", &bundle),
            Err(CryptoError::Decryption)
        );
    }

    #[test]
    fn test_truncated_bundle_fails_closed() {
        assert_eq!(
            AesV2::decrypt(b"k", &[0u8; AesV2::MIN_BUNDLE_SIZE - 1]),
            Err(CryptoError::Decryption)
        );
    }

    #[test]
    fn test_v1_bundle_not_accepted() {
        let bundle = crate::AesV1::encrypt(b"k3y", b"cross-suite").unwrap();
        assert_eq!(AesV2::decrypt(b"k3y", &bundle), Err(CryptoError::Decryption));
    }
}
