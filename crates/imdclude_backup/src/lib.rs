//! Snapshots of documents taken before they are overwritten.
//!
//! Each backup is one file in the store directory: a small binary
//! [`BackupHeader`] (magic, timestamp, generated ID, original path) followed
//! by the document's content. The [`BackupStore`] writes, lists, and restores
//! these files; files without the expected magic are ignored.

#![warn(missing_docs)]

pub mod error;
pub mod header;
pub mod record;
pub mod store;

pub use error::{BackupError, HeaderError};
pub use header::{BackupHeader, BACKUP_MAGIC};
pub use record::{BackupReceipt, BackupRecord};
pub use store::{BackupStore, DEFAULT_EXTENSION};
