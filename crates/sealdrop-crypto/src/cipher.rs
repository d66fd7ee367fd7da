//! AES-256 in CTR mode (128-bit big-endian counter, nonce = initial counter block)
//!
//! Encryption and decryption are the same keystream XOR; output length always
//! equals input length. A nonce must never be reused under the same key.

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};

use crate::error::{CryptoError, CryptoResult};
use crate::{KEY_SIZE, NONCE_SIZE};

type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// XOR `data` with the AES-256-CTR keystream for (`key`, `nonce`).
pub fn apply_keystream(key: &[u8], nonce: &[u8; NONCE_SIZE], data: &[u8]) -> CryptoResult<Vec<u8>> {
    let key: &[u8; KEY_SIZE] = key.try_into().map_err(|_| CryptoError::InvalidKeyLength {
        requested: key.len(),
        supported: &[KEY_SIZE],
    })?;

    let mut buf = data.to_vec();
    let mut cipher = Aes256Ctr::new(key.into(), nonce.into());
    cipher.apply_keystream(&mut buf);
    Ok(buf)
}

pub fn encrypt(key: &[u8], nonce: &[u8; NONCE_SIZE], plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    apply_keystream(key, nonce, plaintext)
}

pub fn decrypt(key: &[u8], nonce: &[u8; NONCE_SIZE], ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    apply_keystream(key, nonce, ciphertext)
}
