//! Reader dispatch
//!
//! Readers are (predicate, parser) pairs tried in table order; the first
//! whose predicate accepts the bytes parses them. Supporting a new container
//! version means appending a row.

use sealdrop_core::FormatVersion;

use crate::container::StoredFile;
use crate::error::FormatResult;
use crate::{v1, v2};

/// One row of the reader table.
#[derive(Clone, Copy)]
pub struct FormatReader {
    pub version: FormatVersion,
    pub complies: fn(&[u8]) -> bool,
    pub read: fn(&str, &[u8]) -> FormatResult<StoredFile>,
}

impl FormatReader {
    pub fn for_version(version: FormatVersion) -> Self {
        match version {
            FormatVersion::V1 => Self {
                version,
                complies: v1::complies,
                read: v1::read,
            },
            FormatVersion::V2 => Self {
                version,
                complies: v2::complies,
                read: v2::read,
            },
        }
    }
}

impl std::fmt::Debug for FormatReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatReader")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Ordered reader table built from the configured versions.
#[derive(Debug, Clone)]
pub struct ReaderRegistry {
    readers: Vec<FormatReader>,
}

impl ReaderRegistry {
    /// Build a registry trying `versions` in the given order. Duplicates are
    /// dropped, keeping the first occurrence.
    pub fn new(versions: &[FormatVersion]) -> Self {
        let mut readers: Vec<FormatReader> = Vec::with_capacity(versions.len());
        for &version in versions {
            if !readers.iter().any(|r| r.version == version) {
                readers.push(FormatReader::for_version(version));
            }
        }
        Self { readers }
    }

    pub fn versions(&self) -> impl Iterator<Item = FormatVersion> + '_ {
        self.readers.iter().map(|r| r.version)
    }

    /// The first reader that recognizes `bytes`, if any.
    pub fn identify(&self, bytes: &[u8]) -> Option<&FormatReader> {
        self.readers.iter().find(|r| (r.complies)(bytes))
    }

    /// Parse `bytes` with the first complying reader.
    ///
    /// `Ok(None)` means no reader recognized the bytes; the caller decides
    /// how to surface that (storage treats it as absent).
    pub fn read(&self, fs_filename: &str, bytes: &[u8]) -> FormatResult<Option<StoredFile>> {
        match self.identify(bytes) {
            Some(reader) => {
                tracing::trace!(version = %reader.version, fs_filename, "reader selected");
                (reader.read)(fs_filename, bytes).map(Some)
            }
            None => Ok(None),
        }
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::new(&FormatVersion::ALL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlainFile;

    fn blob(version: FormatVersion) -> Vec<u8> {
        PlainFile::from_parts(version, "1", "f.txt", "text/plain", b"body".to_vec())
            .to_bytes()
            .unwrap()
    }

    #[test]
    fn test_default_order() {
        let registry = ReaderRegistry::default();
        assert_eq!(
            registry.versions().collect::<Vec<_>>(),
            vec![FormatVersion::V1, FormatVersion::V2]
        );
    }

    #[test]
    fn test_identify_each_version() {
        let registry = ReaderRegistry::default();
        for version in FormatVersion::ALL {
            let reader = registry.identify(&blob(version)).unwrap();
            assert_eq!(reader.version, version);
        }
    }

    #[test]
    fn test_foreign_bytes_unrecognized() {
        let registry = ReaderRegistry::default();
        assert!(registry.read("1", b"\x7fELF\x02\x01\x01\0").unwrap().is_none());
        assert!(registry.read("1", b"").unwrap().is_none());
    }

    #[test]
    fn test_restricted_registry_ignores_other_versions() {
        let registry = ReaderRegistry::new(&[FormatVersion::V2]);
        assert!(registry.read("1", &blob(FormatVersion::V1)).unwrap().is_none());
        assert!(registry.read("1", &blob(FormatVersion::V2)).unwrap().is_some());
    }

    #[test]
    fn test_duplicates_dropped() {
        let registry =
            ReaderRegistry::new(&[FormatVersion::V2, FormatVersion::V1, FormatVersion::V2]);
        assert_eq!(
            registry.versions().collect::<Vec<_>>(),
            vec![FormatVersion::V2, FormatVersion::V1]
        );
    }
}
