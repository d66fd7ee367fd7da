use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{RelayError, RelayResult};
use crate::types::FormatVersion;

/// Top-level relay configuration (loaded from sealdrop.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// TCP listen address (default: 127.0.0.1:8080)
    pub listen: String,
    /// Public base URL used when building file links. When unset the
    /// request's Host header is used.
    pub public_url: Option<String>,
    /// Maximum accepted upload body in bytes (default: 256 MiB)
    pub max_upload_bytes: usize,
    /// Log level (default: info)
    pub log_level: String,
    /// Log format: "json" or "text"
    pub log_format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for uploads that may be swept by an external cleaner
    pub temporary_dir: PathBuf,
    /// Directory for uploads that must be kept
    pub permanent_dir: PathBuf,
    /// JSON file backing the short-name table
    pub shortener_db: PathBuf,
    /// Container version written for new uploads
    pub writer: FormatVersion,
    /// Container readers, tried in this order
    pub readers: Vec<FormatVersion>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".into(),
            public_url: None,
            max_upload_bytes: 256 * 1024 * 1024,
            log_level: "info".into(),
            log_format: "text".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let tmp = std::env::temp_dir();
        Self {
            temporary_dir: tmp.join("sealdrop"),
            permanent_dir: tmp.join("sealdrop-permanent"),
            shortener_db: tmp.join("sealdrop-permanent").join("shortened.json"),
            writer: FormatVersion::V2,
            readers: vec![FormatVersion::V1, FormatVersion::V2],
        }
    }
}

impl RelayConfig {
    /// Reject configurations that parse but cannot run.
    pub fn validate(&self) -> RelayResult<()> {
        if self.storage.readers.is_empty() {
            return Err(RelayError::Config(
                "storage.readers must list at least one format version".into(),
            ));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(RelayError::Config(
                "server.max_upload_bytes must be greater than zero".into(),
            ));
        }
        if let Some(url) = &self.server.public_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(RelayError::Config(format!(
                    "server.public_url must be an http(s) URL, got '{url}'"
                )));
            }
        }
        Ok(())
    }
}

/// Load and validate a config file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> RelayResult<RelayConfig> {
    let config = if path.exists() {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| RelayError::Config(format!("parsing {}: {e}", path.display())))?
    } else {
        tracing::warn!(
            "config file not found: {}  (using defaults)",
            path.display()
        );
        RelayConfig::default()
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[server]
listen = "0.0.0.0:9000"
public_url = "https://drop.example"
max_upload_bytes = 1048576
log_level = "debug"
log_format = "json"

[storage]
temporary_dir = "/tmp/uploads"
permanent_dir = "/srv/uploads"
shortener_db = "/srv/uploads/short.json"
writer = "v1"
readers = ["v2", "v1"]
"#;
        let config: RelayConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.server.listen, "0.0.0.0:9000");
        assert_eq!(config.server.public_url.as_deref(), Some("https://drop.example"));
        assert_eq!(config.server.max_upload_bytes, 1048576);
        assert_eq!(config.server.log_format, "json");
        assert_eq!(config.storage.permanent_dir, PathBuf::from("/srv/uploads"));
        assert_eq!(config.storage.writer, FormatVersion::V1);
        assert_eq!(
            config.storage.readers,
            vec![FormatVersion::V2, FormatVersion::V1]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_defaults() {
        let config: RelayConfig = toml::from_str("").unwrap();

        assert_eq!(config.server.listen, "127.0.0.1:8080");
        assert_eq!(config.server.max_upload_bytes, 256 * 1024 * 1024);
        assert!(config.server.public_url.is_none());
        assert_eq!(config.storage.writer, FormatVersion::V2);
        assert_eq!(
            config.storage.readers,
            vec![FormatVersion::V1, FormatVersion::V2]
        );
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[storage]
writer = "v1"
"#;
        let config: RelayConfig = toml::from_str(toml_str).unwrap();

        // Overridden
        assert_eq!(config.storage.writer, FormatVersion::V1);
        // Defaults
        assert_eq!(config.storage.readers.len(), 2);
        assert_eq!(config.server.log_level, "info");
    }

    #[test]
    fn test_unknown_version_rejected() {
        let result: Result<RelayConfig, _> = toml::from_str("[storage]\nwriter = \"v9\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_readers_invalid() {
        let config: RelayConfig = toml::from_str("[storage]\nreaders = []\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("readers"));
    }

    #[test]
    fn test_bad_public_url_invalid() {
        let config: RelayConfig =
            toml::from_str("[server]\npublic_url = \"drop.example\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.storage.writer, FormatVersion::V2);
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("sealdrop.toml");
        std::fs::write(&path, "[server]\nlisten = \"127.0.0.1:1\"\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.server.listen, "127.0.0.1:1");
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = RelayConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: RelayConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.server.listen, parsed.server.listen);
        assert_eq!(config.storage.temporary_dir, parsed.storage.temporary_dir);
        assert_eq!(config.storage.readers, parsed.storage.readers);
    }
}
