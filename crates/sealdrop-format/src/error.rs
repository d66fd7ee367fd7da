use sealdrop_crypto::CryptoError;
use thiserror::Error;

pub type FormatResult<T> = Result<T, FormatError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Operation not valid for the container's encryption state, e.g.
    /// reading the payload of a sealed file or decrypting a plain one.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// A reader accepted the marker but the rest of the bytes do not parse.
    #[error("malformed container: {0}")]
    Malformed(String),

    #[error("{field} too long: {len} bytes (max {max})")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl FormatError {
    /// True when the error is an authentication failure (wrong key or tampering).
    pub fn is_decryption(&self) -> bool {
        matches!(self, FormatError::Crypto(CryptoError::Decryption))
    }
}
