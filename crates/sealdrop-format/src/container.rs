//! Logical files and their encryption states
//!
//! A [`PlainFile`] carries payload, original filename and MIME type. A
//! [`SealedFile`] carries only the suite bundle; its metadata exists solely
//! inside the ciphertext. The two are separate types, so metadata access on
//! a sealed file does not compile. [`StoredFile`] is what a reader returns
//! before the caller knows which state it is holding; its accessors perform
//! the state check at runtime.
//!
//! The storage-facing filename travels unchanged through every transition.

use sealdrop_core::FormatVersion;

use crate::error::{FormatError, FormatResult};
use crate::{mime, naming, v1, v2};

/// A decrypted (or never-encrypted) container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainFile {
    version: FormatVersion,
    fs_filename: String,
    filename: String,
    mime_type: String,
    payload: Vec<u8>,
}

impl PlainFile {
    /// Build a container for a fresh upload: a new storage name is generated
    /// and the MIME type is sniffed from the payload.
    pub fn new(version: FormatVersion, payload: Vec<u8>, filename: impl Into<String>) -> Self {
        let mime_type = mime::sniff(&payload);
        Self {
            version,
            fs_filename: naming::next_storage_name(),
            filename: filename.into(),
            mime_type,
            payload,
        }
    }

    /// Assemble a container from already-known parts (used by readers).
    pub fn from_parts(
        version: FormatVersion,
        fs_filename: impl Into<String>,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            version,
            fs_filename: fs_filename.into(),
            filename: filename.into(),
            mime_type: mime_type.into(),
            payload,
        }
    }

    pub fn with_fs_filename(mut self, fs_filename: impl Into<String>) -> Self {
        self.fs_filename = fs_filename.into();
        self
    }

    pub fn version(&self) -> FormatVersion {
        self.version
    }

    pub fn fs_filename(&self) -> &str {
        &self.fs_filename
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Serialize to the on-disk representation for this container's version.
    pub fn to_bytes(&self) -> FormatResult<Vec<u8>> {
        match self.version {
            FormatVersion::V1 => v1::encode_plain(self),
            FormatVersion::V2 => v2::encode_plain(self),
        }
    }

    /// Encrypt with the version's suite. One-way: the plain file is consumed.
    pub fn encrypt(self, key: &[u8]) -> FormatResult<SealedFile> {
        let bundle = match self.version {
            FormatVersion::V1 => v1::seal(&self, key)?,
            FormatVersion::V2 => v2::seal(&self, key)?,
        };
        tracing::debug!(
            version = %self.version,
            fs_filename = %self.fs_filename,
            "container encrypted"
        );
        Ok(SealedFile {
            version: self.version,
            fs_filename: self.fs_filename,
            bundle,
        })
    }
}

/// An encrypted container. Only the storage name and bundle are visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedFile {
    version: FormatVersion,
    fs_filename: String,
    bundle: Vec<u8>,
}

impl SealedFile {
    pub fn from_parts(
        version: FormatVersion,
        fs_filename: impl Into<String>,
        bundle: Vec<u8>,
    ) -> Self {
        Self {
            version,
            fs_filename: fs_filename.into(),
            bundle,
        }
    }

    pub fn version(&self) -> FormatVersion {
        self.version
    }

    pub fn fs_filename(&self) -> &str {
        &self.fs_filename
    }

    pub fn bundle(&self) -> &[u8] {
        &self.bundle
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self.version {
            FormatVersion::V1 => v1::encode_sealed(self),
            FormatVersion::V2 => v2::encode_sealed(self),
        }
    }

    /// Verify and decrypt. Wrong key or tampering yields
    /// `FormatError::Crypto(CryptoError::Decryption)`.
    pub fn decrypt(&self, key: &[u8]) -> FormatResult<PlainFile> {
        match self.version {
            FormatVersion::V1 => v1::open(self, key),
            FormatVersion::V2 => v2::open(self, key),
        }
    }
}

/// A container whose encryption state is only known at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredFile {
    Plain(PlainFile),
    Sealed(SealedFile),
}

impl StoredFile {
    pub fn version(&self) -> FormatVersion {
        match self {
            StoredFile::Plain(f) => f.version(),
            StoredFile::Sealed(f) => f.version(),
        }
    }

    pub fn fs_filename(&self) -> &str {
        match self {
            StoredFile::Plain(f) => f.fs_filename(),
            StoredFile::Sealed(f) => f.fs_filename(),
        }
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self, StoredFile::Sealed(_))
    }

    pub fn to_bytes(&self) -> FormatResult<Vec<u8>> {
        match self {
            StoredFile::Plain(f) => f.to_bytes(),
            StoredFile::Sealed(f) => Ok(f.to_bytes()),
        }
    }

    fn plain(&self, what: &'static str) -> FormatResult<&PlainFile> {
        match self {
            StoredFile::Plain(f) => Ok(f),
            StoredFile::Sealed(_) => Err(FormatError::InvalidState(what)),
        }
    }

    pub fn payload(&self) -> FormatResult<&[u8]> {
        self.plain("cannot read the payload of an encrypted file")
            .map(PlainFile::payload)
    }

    pub fn filename(&self) -> FormatResult<&str> {
        self.plain("cannot read the filename of an encrypted file")
            .map(PlainFile::filename)
    }

    pub fn mime_type(&self) -> FormatResult<&str> {
        self.plain("cannot read the MIME type of an encrypted file")
            .map(PlainFile::mime_type)
    }

    pub fn encrypt(self, key: &[u8]) -> FormatResult<StoredFile> {
        match self {
            StoredFile::Plain(f) => f.encrypt(key).map(StoredFile::Sealed),
            StoredFile::Sealed(_) => Err(FormatError::InvalidState("file already encrypted")),
        }
    }

    pub fn decrypt(&self, key: &[u8]) -> FormatResult<PlainFile> {
        match self {
            StoredFile::Sealed(f) => f.decrypt(key),
            StoredFile::Plain(_) => Err(FormatError::InvalidState("file not encrypted")),
        }
    }

    /// The plain file, decrypting first if needed.
    pub fn into_plain(self, key: &[u8]) -> FormatResult<PlainFile> {
        match self {
            StoredFile::Plain(f) => Ok(f),
            StoredFile::Sealed(f) => f.decrypt(key),
        }
    }
}

impl From<PlainFile> for StoredFile {
    fn from(file: PlainFile) -> Self {
        StoredFile::Plain(file)
    }
}

impl From<SealedFile> for StoredFile {
    fn from(file: SealedFile) -> Self {
        StoredFile::Sealed(file)
    }
}
