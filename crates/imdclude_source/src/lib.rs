//! Source access for documents: file systems, line reading, and include detection.
//!
//! This crate provides the [`FileSystem`] abstraction documents are opened
//! through ([`DiskFs`] for real files, [`MemoryFs`] for tests), the
//! [`LineReader`] that splits a byte stream into logical lines, and
//! [`find_include`] which recognizes `#include "path"` directives.

#![warn(missing_docs)]

pub mod fs;
pub mod include;
pub mod line_reader;

pub use fs::{DiskFs, FileSystem, MemoryFs};
pub use include::find_include;
pub use line_reader::{merge_lines, split_lines, LineError, LineReader, ReaderOptions};
