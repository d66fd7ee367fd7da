//! HMAC-SHA256 authentication tags

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{CryptoError, CryptoResult};
use crate::TAG_SIZE;

type HmacSha256 = Hmac<Sha256>;

fn keyed(key: &[u8]) -> CryptoResult<HmacSha256> {
    <HmacSha256 as Mac>::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength {
        requested: key.len(),
        supported: &[],
    })
}

/// Compute the tag over `data`.
pub fn build(key: &[u8], data: &[u8]) -> CryptoResult<[u8; TAG_SIZE]> {
    let mut mac = keyed(key)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().into())
}

/// Verify `tag` over `data` in constant time.
///
/// Any mismatch, including a tag of the wrong length, is reported as
/// [`CryptoError::Decryption`].
pub fn verify(key: &[u8], data: &[u8], tag: &[u8]) -> CryptoResult<()> {
    let mut mac = keyed(key)?;
    mac.update(data);
    mac.verify_slice(tag).map_err(|_| CryptoError::Decryption)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_verify() {
        let key = [3u8; 32];
        let tag = build(&key, b"nonce||ciphertext").unwrap();
        assert!(verify(&key, b"nonce||ciphertext", &tag).is_ok());
    }

    #[test]
    fn test_rfc4231_case_2() {
        let tag = build(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            &tag[..8],
            &[0x5b, 0xdc, 0xc1, 0x46, 0xbf, 0x60, 0x75, 0x4e]
        );
    }

    #[test]
    fn test_wrong_key_fails() {
        let tag = build(&[1u8; 32], b"data").unwrap();
        assert_eq!(
            verify(&[2u8; 32], b"data", &tag),
            Err(CryptoError::Decryption)
        );
    }

    #[test]
    fn test_modified_data_fails() {
        let key = [1u8; 32];
        let tag = build(&key, b"data").unwrap();
        assert_eq!(verify(&key, b"dat4", &tag), Err(CryptoError::Decryption));
    }

    #[test]
    fn test_truncated_tag_fails() {
        let key = [1u8; 32];
        let tag = build(&key, b"data").unwrap();
        assert_eq!(
            verify(&key, b"data", &tag[..16]),
            Err(CryptoError::Decryption)
        );
    }
}
