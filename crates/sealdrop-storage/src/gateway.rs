//! Storage gateway: containers in, containers out
//!
//! Uploads live in one of two locations. Lookups probe the permanent
//! location first, then the temporary one. A blob that is missing, that no
//! configured reader recognizes, or that a reader rejects as malformed is
//! reported as `NotFound` in every case; callers cannot tell them apart.
//!
//! The gateway holds no key material and never encrypts or decrypts.

use opendal::Operator;
use tracing::{debug, warn};

use sealdrop_core::config::StorageConfig;
use sealdrop_core::{FormatVersion, RelayError, RelayResult, StorageLocation};
use sealdrop_format::{is_valid_storage_name, ReaderRegistry, StoredFile};

use crate::operator::build_fs_operator;

pub struct StorageGateway {
    permanent: Operator,
    temporary: Operator,
    registry: ReaderRegistry,
    writer: FormatVersion,
}

impl StorageGateway {
    pub fn new(
        permanent: Operator,
        temporary: Operator,
        registry: ReaderRegistry,
        writer: FormatVersion,
    ) -> Self {
        Self {
            permanent,
            temporary,
            registry,
            writer,
        }
    }

    /// Filesystem-backed gateway over the configured directories.
    pub fn from_config(cfg: &StorageConfig) -> RelayResult<Self> {
        let permanent = build_fs_operator(&cfg.permanent_dir)?;
        let temporary = build_fs_operator(&cfg.temporary_dir)?;
        debug!(
            permanent = %cfg.permanent_dir.display(),
            temporary = %cfg.temporary_dir.display(),
            writer = %cfg.writer,
            "storage gateway ready"
        );
        Ok(Self::new(
            permanent,
            temporary,
            ReaderRegistry::new(&cfg.readers),
            cfg.writer,
        ))
    }

    /// Container version used for new uploads.
    pub fn writer(&self) -> FormatVersion {
        self.writer
    }

    pub fn registry(&self) -> &ReaderRegistry {
        &self.registry
    }

    fn operator(&self, location: StorageLocation) -> &Operator {
        match location {
            StorageLocation::Permanent => &self.permanent,
            StorageLocation::Temporary => &self.temporary,
        }
    }

    pub(crate) fn operators(&self) -> [(StorageLocation, &Operator); 2] {
        StorageLocation::PROBE_ORDER.map(|loc| (loc, self.operator(loc)))
    }

    /// Where `name` is stored, if anywhere.
    pub async fn exists(&self, name: &str) -> RelayResult<Option<StorageLocation>> {
        if !is_valid_storage_name(name) {
            return Ok(None);
        }
        for location in StorageLocation::PROBE_ORDER {
            let found = self
                .operator(location)
                .exists(name)
                .await
                .map_err(|e| RelayError::Storage(format!("probing {location}/{name}: {e}")))?;
            if found {
                return Ok(Some(location));
            }
        }
        Ok(None)
    }

    /// Load and parse `name` from `location`.
    pub async fn read(&self, location: StorageLocation, name: &str) -> RelayResult<StoredFile> {
        if !is_valid_storage_name(name) {
            return Err(RelayError::NotFound(name.to_string()));
        }

        let bytes = match self.operator(location).read(name).await {
            Ok(buf) => buf.to_vec(),
            Err(e) if e.kind() == opendal::ErrorKind::NotFound => {
                return Err(RelayError::NotFound(name.to_string()));
            }
            Err(e) => {
                return Err(RelayError::Storage(format!("reading {location}/{name}: {e}")));
            }
        };

        match self.registry.read(name, &bytes) {
            Ok(Some(file)) => Ok(file),
            Ok(None) => {
                warn!(%location, name, len = bytes.len(), "no reader recognizes blob, hiding it");
                Err(RelayError::NotFound(name.to_string()))
            }
            Err(e) => {
                warn!(%location, name, error = %e, "malformed blob, hiding it");
                Err(RelayError::NotFound(name.to_string()))
            }
        }
    }

    /// Probe both locations and read from the first that has `name`.
    pub async fn locate(&self, name: &str) -> RelayResult<(StorageLocation, StoredFile)> {
        let location = self
            .exists(name)
            .await?
            .ok_or_else(|| RelayError::NotFound(name.to_string()))?;
        let file = self.read(location, name).await?;
        Ok((location, file))
    }

    /// Serialize `file` and store it under its storage-facing filename.
    ///
    /// Names are unique across both locations. A name that is already taken
    /// anywhere fails with `AlreadyExists` and the stored blob is untouched.
    pub async fn write(&self, location: StorageLocation, file: &StoredFile) -> RelayResult<()> {
        let name = file.fs_filename();
        if !is_valid_storage_name(name) {
            return Err(RelayError::Storage(format!(
                "refusing to write invalid name '{name}'"
            )));
        }
        if let Some(existing) = self.exists(name).await? {
            warn!(%location, %existing, name, "storage name already taken, not overwriting");
            return Err(RelayError::AlreadyExists(format!("{existing}/{name}")));
        }
        let bytes = file
            .to_bytes()
            .map_err(|e| RelayError::Format(e.to_string()))?;
        let len = bytes.len();

        self.operator(location)
            .write(name, bytes)
            .await
            .map_err(|e| RelayError::Storage(format!("writing {location}/{name}: {e}")))?;

        debug!(%location, name, len, encrypted = file.is_encrypted(), "stored container");
        Ok(())
    }
}
