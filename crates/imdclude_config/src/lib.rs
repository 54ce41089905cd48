//! Parsing and validation of `imdclude.toml` configuration files.
//!
//! This crate reads the optional configuration file and produces a
//! strongly-typed [`ToolConfig`]: the default lookup directory, the backup
//! store location and file extension, and line reader limits.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{discover_config, load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{default_backup_dir, resolve_backup_dir};
pub use types::*;
