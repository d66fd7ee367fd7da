use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// On-disk container format version.
///
/// Every stored blob carries a marker identifying which of these produced it.
/// Both versions stay readable forever; new uploads use whichever one is
/// configured as the writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatVersion {
    /// One-byte `'0'`/`'1'` marker with a trailing filename footer, no MIME type
    V1,
    /// Fixed 8-byte binary header with length-prefixed filename and MIME type
    #[default]
    V2,
}

impl FormatVersion {
    pub const ALL: [FormatVersion; 2] = [FormatVersion::V1, FormatVersion::V2];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatVersion::V1 => "v1",
            FormatVersion::V2 => "v2",
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(FormatVersion::V1),
            "v2" | "2" => Ok(FormatVersion::V2),
            other => Err(format!("unknown format version '{other}' (expected v1 or v2)")),
        }
    }
}

/// Where a blob lives on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageLocation {
    Permanent,
    Temporary,
}

impl StorageLocation {
    /// Probe order used when looking a name up.
    pub const PROBE_ORDER: [StorageLocation; 2] =
        [StorageLocation::Permanent, StorageLocation::Temporary];
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageLocation::Permanent => f.write_str("permanent"),
            StorageLocation::Temporary => f.write_str("temporary"),
        }
    }
}
