//! Resolution of configured locations into concrete paths.

use crate::types::ToolConfig;
use std::path::{Path, PathBuf};

/// Returns the backup store directory used when none is configured.
///
/// `<home>/tmp/imdclude` when a home directory is known, otherwise
/// `<system temp>/imdclude`.
pub fn default_backup_dir(home: Option<&Path>) -> PathBuf {
    match home {
        Some(home) => home.join("tmp").join("imdclude"),
        None => std::env::temp_dir().join("imdclude"),
    }
}

/// Resolves the backup store directory from the configuration.
///
/// A configured `backup.dir` wins; a leading `~/` in it is expanded to the
/// home directory.
pub fn resolve_backup_dir(config: &ToolConfig) -> PathBuf {
    resolve_backup_dir_with_home(config, dirs::home_dir().as_deref())
}

fn resolve_backup_dir_with_home(config: &ToolConfig, home: Option<&Path>) -> PathBuf {
    match config.backup.dir.as_deref() {
        Some(dir) => match (dir.strip_prefix("~/"), home) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(dir),
        },
        None => default_backup_dir(home),
    }
}
