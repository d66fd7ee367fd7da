//! Encrypt-then-MAC suites
//!
//! Both suites run the same KDF → CTR → HMAC pipeline and differ only in how
//! the salt, nonce, ciphertext and tag are laid out in the bundle. The suite
//! is selected by the container version, never by sniffing the bundle.

mod v1;
mod v2;

pub use v1::AesV1;
pub use v2::AesV2;

use rand::RngCore;

use crate::error::{CryptoError, CryptoResult};
use crate::kdf::{derive_key, KdfParams};
use crate::{cipher, mac, ITERATIONS, KEY_SIZE, NONCE_SIZE, SALT_SIZE, TAG_SIZE};

/// A stateless encrypt/decrypt pair keyed by the caller-supplied access key.
pub trait Suite {
    /// Identifier written into bundles that carry a suite header.
    const ID: u16;

    /// Encrypt `plaintext` under a fresh random salt and nonce.
    fn encrypt(key: &[u8], plaintext: &[u8]) -> CryptoResult<Vec<u8>>;

    /// Verify then decrypt a bundle produced by [`Suite::encrypt`].
    ///
    /// Fails with [`CryptoError::Decryption`] for a wrong key, a corrupted
    /// bundle, or a bundle too short to contain its fixed fields.
    fn decrypt(key: &[u8], bundle: &[u8]) -> CryptoResult<Vec<u8>>;
}

/// Intermediate result of the shared encryption pipeline.
pub(crate) struct Sealed {
    pub salt: [u8; SALT_SIZE],
    /// `nonce || ciphertext`, the region covered by the tag
    pub authenticated: Vec<u8>,
    pub tag: [u8; TAG_SIZE],
}

fn suite_params() -> CryptoResult<KdfParams> {
    KdfParams::new(KEY_SIZE * 2, ITERATIONS)
}

pub(crate) fn seal(key: &[u8], plaintext: &[u8]) -> CryptoResult<Sealed> {
    let params = suite_params()?;

    let mut salt = [0u8; SALT_SIZE];
    let mut nonce = [0u8; NONCE_SIZE];
    let mut rng = rand::thread_rng();
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut nonce);

    let dk = derive_key(&params, key, &salt);
    let ciphertext = cipher::encrypt(dk.cipher_key(), &nonce, plaintext)?;

    let mut authenticated = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    authenticated.extend_from_slice(&nonce);
    authenticated.extend_from_slice(&ciphertext);

    let tag = mac::build(dk.mac_key(), &authenticated)?;

    tracing::trace!(plaintext_len = plaintext.len(), "sealed payload");
    Ok(Sealed {
        salt,
        authenticated,
        tag,
    })
}

pub(crate) fn open(
    key: &[u8],
    salt: &[u8],
    authenticated: &[u8],
    tag: &[u8],
) -> CryptoResult<Vec<u8>> {
    if authenticated.len() < NONCE_SIZE {
        return Err(CryptoError::Decryption);
    }

    let params = suite_params()?;
    let dk = derive_key(&params, key, salt);

    // Nothing is decrypted until the tag checks out
    mac::verify(dk.mac_key(), authenticated, tag)?;

    let (nonce, ciphertext) = authenticated.split_at(NONCE_SIZE);
    let nonce: &[u8; NONCE_SIZE] = nonce.try_into().map_err(|_| CryptoError::Decryption)?;
    cipher::decrypt(dk.cipher_key(), nonce, ciphertext)
}
