use thiserror::Error;

pub type CryptoResult<T> = Result<T, CryptoError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("unsupported derived key length: {requested} bytes (supported: {supported:?})")]
    InvalidKeyLength {
        requested: usize,
        supported: &'static [usize],
    },

    #[error("KDF iteration count must be greater than zero")]
    InvalidIterations,

    /// MAC verification failed. Wrong key, wrong salt, truncation and
    /// tampering all surface as this one variant.
    #[error("decryption failed: invalid key or corrupted data")]
    Decryption,
}
