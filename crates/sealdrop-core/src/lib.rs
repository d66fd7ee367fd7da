pub mod config;
pub mod error;
pub mod types;

pub use config::{load_config, RelayConfig};
pub use error::{RelayError, RelayResult};
pub use types::{FormatVersion, StorageLocation};
