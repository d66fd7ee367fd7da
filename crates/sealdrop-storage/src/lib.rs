//! sealdrop-storage: the only disk-facing component
//!
//! - `gateway`: locate, read and write containers across the permanent and
//!   temporary locations
//! - `operator`: OpenDAL operator construction
//! - `shorten`: persistent short-name table
//! - `health`: liveness probe for the backing stores

pub mod gateway;
pub mod health;
pub mod operator;
pub mod shorten;

pub use gateway::StorageGateway;
pub use health::check_health;
pub use operator::build_fs_operator;
pub use shorten::ShortNameTable;
