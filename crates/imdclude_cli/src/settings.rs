//! Effective settings: the config file merged with command-line overrides.

use std::path::{Path, PathBuf};

use imdclude_backup::BackupStore;
use imdclude_config::{discover_config, load_config, resolve_backup_dir, ToolConfig};
use imdclude_source::ReaderOptions;

use crate::Cli;

/// Everything a command needs beyond its own arguments.
#[derive(Debug)]
pub struct Settings {
    /// Directory include paths are resolved against.
    pub lookup_dir: PathBuf,
    /// Where backups are written and read.
    pub store: BackupStore,
    /// Line reader limits.
    pub reader: ReaderOptions,
}

impl Settings {
    /// Loads the configuration (`--config`, else `./imdclude.toml`, else
    /// defaults) and applies the flags that override it.
    pub fn from_cli(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let config = match cli.config {
            Some(ref path) => load_config(Path::new(path))?,
            None => discover_config(&std::env::current_dir()?)?,
        };
        Ok(Self::from_config(&config, cli.dir.as_deref()))
    }

    /// Builds settings from a loaded config and an optional `--dir` override.
    pub fn from_config(config: &ToolConfig, dir: Option<&str>) -> Self {
        let lookup_dir = PathBuf::from(dir.unwrap_or(&config.lookup.dir));
        let store = BackupStore::new(resolve_backup_dir(config))
            .with_extension(config.backup.extension.clone());
        let reader = ReaderOptions {
            buffer_capacity: config.reader.buffer_capacity,
            max_line_bytes: config.reader.max_line_bytes,
        };
        Self {
            lookup_dir,
            store,
            reader,
        }
    }
}
