//! Decoded backups.

use std::path::{Path, PathBuf};

use imdclude_common::ContentHash;
use imdclude_source::merge_lines;

/// Result of writing a backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupReceipt {
    /// The generated ID, used later to restore this backup.
    pub id: String,
    /// Where the backup file was written.
    pub path: PathBuf,
}

/// A backup read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    /// The ID assigned when the backup was written.
    pub id: String,
    /// The document path the content was taken from and is restored to.
    pub original_path: PathBuf,
    /// Creation time in unix seconds.
    pub timestamp: u32,
    /// The backed-up lines.
    pub content: Vec<String>,
    /// The backup file inside the store.
    pub file: PathBuf,
}

impl BackupRecord {
    /// Base name of the original document.
    pub fn name(&self) -> String {
        self.original_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.original_path.display().to_string())
    }

    /// The content as it is written back on restore.
    pub fn merged_content(&self) -> Vec<u8> {
        merge_lines(&self.content)
    }

    /// Fingerprint of the merged content.
    pub fn content_hash(&self) -> ContentHash {
        ContentHash::from_bytes(&self.merged_content())
    }

    /// Size of the merged content in bytes.
    pub fn size_bytes(&self) -> usize {
        self.merged_content().len()
    }

    /// Returns `true` if this backup was taken from `path`.
    pub fn is_of(&self, path: &Path) -> bool {
        self.original_path == path
    }
}
