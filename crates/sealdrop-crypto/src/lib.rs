//! sealdrop-crypto: encrypt-then-MAC suites for stored uploads
//!
//! Pipeline (shared by every suite, only the bundle layout differs):
//!
//! ```text
//! salt  = random 16 bytes          nonce = random 16 bytes
//! dk    = PBKDF2-HMAC-SHA256(access key, salt, 100_000 iterations, 64 bytes)
//!   ├── cipher key = dk[..32]
//!   └── MAC key    = dk[32..]
//! ct    = AES-256-CTR(cipher key, nonce, plaintext)
//! tag   = HMAC-SHA256(MAC key, nonce || ct)
//! ```
//!
//! Decryption re-derives the key from the bundle's salt and verifies the tag
//! before a single byte is decrypted.

pub mod cipher;
pub mod error;
pub mod kdf;
pub mod keys;
pub mod mac;
pub mod suite;

pub use error::{CryptoError, CryptoResult};
pub use kdf::{derive_key, DerivedKey, KdfParams};
pub use keys::AccessKey;
pub use suite::{AesV1, AesV2, Suite};

/// AES-256 key size in bytes
pub const KEY_SIZE: usize = 32;

/// PBKDF2 salt size in bytes
pub const SALT_SIZE: usize = 16;

/// CTR nonce size (one AES block)
pub const NONCE_SIZE: usize = 16;

/// HMAC-SHA256 tag size
pub const TAG_SIZE: usize = 32;

/// Fixed PBKDF2 iteration count. Not stored in bundles, so changing it makes
/// every existing encrypted blob unreadable.
pub const ITERATIONS: u32 = 100_000;
