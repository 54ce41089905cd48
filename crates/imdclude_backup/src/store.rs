//! The directory of backup files.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use imdclude_source::{merge_lines, split_lines};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::error::{BackupError, HeaderError};
use crate::header::BackupHeader;
use crate::record::{BackupReceipt, BackupRecord};

/// File extension used for backup files unless configured otherwise.
pub const DEFAULT_EXTENSION: &str = "bkup";

/// Length of the random part of a backup file name.
const FILE_SUFFIX_LEN: usize = 8;

/// How often to retry when a generated file name is already taken.
const MAX_NAME_ATTEMPTS: usize = 16;

/// A directory holding one file per backup.
///
/// Each file is named `<document name>.<random>.<extension>` and holds a
/// [`BackupHeader`] followed by the document's content. Files that do not
/// start with a valid header are left alone and never listed.
#[derive(Debug, Clone)]
pub struct BackupStore {
    /// Directory the backups live in.
    dir: PathBuf,

    /// Extension given to new backup files.
    extension: String,
}

impl BackupStore {
    /// Creates a store rooted at `dir`. Nothing is touched on disk until the
    /// first backup is written.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Uses `extension` (without the dot) for new backup files.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// The store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the store directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<(), BackupError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| BackupError::Io {
            path: self.dir.clone(),
            source: e,
        })
    }

    /// Writes a backup of `lines`, taken from the document `name` at
    /// `original_path`, and returns its generated ID and file location.
    pub fn backup<S: AsRef<str>>(
        &self,
        name: &str,
        original_path: &Path,
        lines: &[S],
    ) -> Result<BackupReceipt, BackupError> {
        self.ensure_dir()?;
        let (file, path) = self.create_unique(name)?;
        let io_err = |e: io::Error| BackupError::Io {
            path: path.clone(),
            source: e,
        };

        let mut header = BackupHeader::new(original_path.to_string_lossy(), now_unix());
        let mut writer = BufWriter::new(file);
        header.write_to(&mut writer).map_err(io_err)?;
        writer.write_all(&merge_lines(lines)).map_err(io_err)?;
        writer.flush().map_err(io_err)?;

        tracing::info!(
            "backed up {} to {} as {}",
            original_path.display(),
            path.display(),
            header.id
        );
        Ok(BackupReceipt {
            id: header.id,
            path,
        })
    }

    /// Lists every valid backup in the store, oldest first.
    ///
    /// Entries whose header does not decode (foreign files, corruption,
    /// truncation) are skipped. A missing store directory is an error.
    pub fn list(&self) -> Result<Vec<BackupRecord>, BackupError> {
        if !self.dir.is_dir() {
            return Err(BackupError::StoreMissing {
                path: self.dir.clone(),
            });
        }

        let entries = std::fs::read_dir(&self.dir).map_err(|e| BackupError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let mut records = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    tracing::warn!("skipping unreadable entry in {}: {e}", self.dir.display());
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            records.extend(listed(self.inspect(&path)));
        }

        records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }

    /// Decodes a single backup file.
    pub fn inspect(&self, path: &Path) -> Result<BackupRecord, BackupError> {
        let io_err = |e: io::Error| BackupError::Io {
            path: path.to_path_buf(),
            source: e,
        };
        let invalid = |source: HeaderError| BackupError::InvalidHeader {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_err)?;
        let file_len = file.metadata().map_err(io_err)?.len();
        let mut reader = BufReader::new(file);

        let header = BackupHeader::read_from(&mut reader).map_err(|e| match e {
            HeaderError::Io(source) => io_err(source),
            other => invalid(other),
        })?;

        let content_len = file_len
            .checked_sub(header.encoded_len() as u64)
            .ok_or_else(|| invalid(HeaderError::Truncated))?;
        let mut content = vec![0u8; content_len as usize];
        reader.read_exact(&mut content).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => invalid(HeaderError::Truncated),
            _ => io_err(e),
        })?;

        Ok(BackupRecord {
            id: header.id,
            original_path: PathBuf::from(header.original_path),
            timestamp: header.timestamp,
            content: split_lines(&content),
            file: path.to_path_buf(),
        })
    }

    /// Finds the backup with the given ID.
    pub fn find(&self, id: &str) -> Result<BackupRecord, BackupError> {
        self.list()?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| BackupError::NotFound { id: id.to_string() })
    }

    /// Restores the backup with the given ID over its original path.
    pub fn restore(&self, id: &str) -> Result<BackupRecord, BackupError> {
        let record = self.find(id)?;
        self.restore_record(&record)?;
        Ok(record)
    }

    /// Overwrites `record.original_path` with the record's content, creating
    /// parent directories as needed.
    pub fn restore_record(&self, record: &BackupRecord) -> Result<(), BackupError> {
        let target = &record.original_path;
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| BackupError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        // `write` truncates any existing content first.
        std::fs::write(target, record.merged_content()).map_err(|e| BackupError::Io {
            path: target.clone(),
            source: e,
        })?;

        tracing::info!("restored backup {} to {}", record.id, target.display());
        Ok(())
    }

    /// Creates a new, previously nonexistent backup file for document `name`.
    fn create_unique(&self, name: &str) -> Result<(File, PathBuf), BackupError> {
        let mut last_err = None;
        for _ in 0..MAX_NAME_ATTEMPTS {
            let path = self
                .dir
                .join(format!("{name}.{}.{}", random_suffix(), self.extension));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((file, path)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => last_err = Some(e),
                Err(e) => return Err(BackupError::Io { path, source: e }),
            }
        }
        Err(BackupError::Io {
            path: self.dir.clone(),
            source: last_err
                .unwrap_or_else(|| io::Error::new(io::ErrorKind::AlreadyExists, "no free name")),
        })
    }
}

/// Keeps a decoded backup, logging and dropping entries that did not decode.
fn listed(result: Result<BackupRecord, BackupError>) -> Option<BackupRecord> {
    match result {
        Ok(record) => Some(record),
        Err(BackupError::InvalidHeader { path, source }) => {
            tracing::debug!("skipping {}: {source}", path.display());
            None
        }
        Err(e) => {
            tracing::warn!("skipping backup: {e}");
            None
        }
    }
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(FILE_SUFFIX_LEN)
        .map(char::from)
        .collect()
}

fn now_unix() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}
