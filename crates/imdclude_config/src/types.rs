//! Configuration types deserialized from `imdclude.toml`.

use serde::Deserialize;

/// Default include lookup directory.
pub const DEFAULT_LOOKUP_DIR: &str = ".";

pub use imdclude_backup::DEFAULT_EXTENSION as DEFAULT_BACKUP_EXTENSION;
pub use imdclude_source::line_reader::{DEFAULT_BUFFER_CAPACITY, DEFAULT_MAX_LINE_BYTES};

/// The top-level configuration parsed from `imdclude.toml`.
///
/// Every section is optional; a missing file behaves like an empty one.
#[derive(Debug, Default, Deserialize)]
pub struct ToolConfig {
    /// Where include targets are looked up.
    #[serde(default)]
    pub lookup: LookupConfig,
    /// Where and how backups are stored.
    #[serde(default)]
    pub backup: BackupConfig,
    /// Line reader limits.
    #[serde(default)]
    pub reader: ReaderConfig,
}

/// Include lookup settings.
#[derive(Debug, Deserialize)]
pub struct LookupConfig {
    /// Directory include paths are relative to.
    #[serde(default = "default_lookup_dir")]
    pub dir: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            dir: default_lookup_dir(),
        }
    }
}

/// Backup store settings.
#[derive(Debug, Deserialize)]
pub struct BackupConfig {
    /// Store directory. Derived from the home directory when unset.
    #[serde(default)]
    pub dir: Option<String>,
    /// Extension (without the dot) given to backup files.
    #[serde(default = "default_backup_extension")]
    pub extension: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            dir: None,
            extension: default_backup_extension(),
        }
    }
}

/// Line reader settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ReaderConfig {
    /// Internal buffer size in bytes.
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
    /// Longest accepted logical line in bytes.
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

fn default_lookup_dir() -> String {
    DEFAULT_LOOKUP_DIR.to_string()
}

fn default_backup_extension() -> String {
    DEFAULT_BACKUP_EXTENSION.to_string()
}

fn default_buffer_capacity() -> usize {
    DEFAULT_BUFFER_CAPACITY
}

fn default_max_line_bytes() -> usize {
    DEFAULT_MAX_LINE_BYTES
}
