//! Error types for backup operations.

use std::path::PathBuf;

/// Errors that can occur while writing, listing, or restoring backups.
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    /// An I/O error occurred while reading or writing a backup or restore target.
    #[error("backup I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The store directory does not exist (or is not a directory).
    #[error("backup location {path} does not exist")]
    StoreMissing {
        /// The configured store directory.
        path: PathBuf,
    },

    /// A file in the store is not a readable backup.
    #[error("invalid backup header in {path}: {source}")]
    InvalidHeader {
        /// The backup file path.
        path: PathBuf,
        /// What was wrong with the header.
        source: HeaderError,
    },

    /// No backup with the requested identifier exists.
    #[error("unable to find backup of ID: {id}")]
    NotFound {
        /// The identifier that was requested.
        id: String,
    },
}

/// Problems decoding a [`BackupHeader`](crate::BackupHeader).
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    /// The leading magic number is not the expected one.
    #[error("magic prefix {found:#06x} does not match {expected:#06x}")]
    BadMagic {
        /// The magic number expected by the reader.
        expected: u16,
        /// The magic number found in the file.
        found: u16,
    },

    /// The data ended before the header was complete.
    #[error("header is truncated")]
    Truncated,

    /// A length prefix is larger than any real header would carry.
    #[error("{field} length {len} exceeds {max} bytes")]
    FieldTooLong {
        /// Which variable-length field.
        field: &'static str,
        /// The length read from the file.
        len: u32,
        /// The accepted maximum.
        max: u32,
    },

    /// A string field is not valid UTF-8.
    #[error("{field} is not valid UTF-8")]
    InvalidUtf8 {
        /// Which variable-length field.
        field: &'static str,
    },

    /// The underlying reader failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
