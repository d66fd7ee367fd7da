//! sealdrop-format: versioned binary containers for stored uploads
//!
//! # Overview
//! - `container`: [`PlainFile`] / [`SealedFile`] and the [`StoredFile`] union
//!   a reader hands back when it does not yet know which one it has
//! - `v1`: one-byte `'0'`/`'1'` marker, filename footer, AESv1 suite
//! - `v2`: 8-byte binary header, length-prefixed metadata, AESv2 suite
//! - `registry`: ordered (predicate, parser) table that picks the reader
//! - `mime`: content sniffing for payloads without a stored MIME type
//! - `naming`: storage-facing filename generation and validation

pub mod container;
pub mod error;
pub mod mime;
pub mod naming;
pub mod registry;
pub mod v1;
pub mod v2;

pub use container::{PlainFile, SealedFile, StoredFile};
pub use error::{FormatError, FormatResult};
pub use naming::{is_valid_storage_name, next_storage_name};
pub use registry::{FormatReader, ReaderRegistry};
pub use sealdrop_core::FormatVersion;
