//! File access used to open documents and their includes.

use std::collections::BTreeMap;
use std::io::{self, Cursor, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Read access to a tree of files.
///
/// Documents never touch `std::fs` directly; they are opened through a
/// `FileSystem` so the whole include graph can be exercised against an
/// in-memory file set in tests.
pub trait FileSystem {
    /// Opens `path` for reading.
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>>;

    /// Returns the absolute location `path` refers to.
    ///
    /// Used for diagnostics, cycle detection, and as the original path
    /// recorded in backups.
    fn absolute(&self, path: &Path) -> PathBuf;
}

/// The real file system, with relative paths resolved against the process
/// working directory. Existing paths are canonicalized, so symlinked
/// spellings of one file compare equal.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFs;

impl FileSystem for DiskFs {
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        let file = std::fs::File::open(path)?;
        Ok(Box::new(file))
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        std::fs::canonicalize(path)
            .or_else(|_| std::path::absolute(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

/// An in-memory file set rooted at `/`.
///
/// Paths are normalized before lookup (`./` dropped, `..` applied), so
/// `docs/a.md`, `./docs/a.md` and `/docs/a.md` name the same file. Every
/// handle returned by [`open`](FileSystem::open) is counted until dropped.
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: BTreeMap<PathBuf, Vec<u8>>,
    open_handles: Arc<AtomicUsize>,
}

impl MemoryFs {
    /// Creates an empty file set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a file, builder style.
    pub fn with_file(mut self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) -> Self {
        self.add_file(path, content);
        self
    }

    /// Adds (or replaces) a file.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.files.insert(normalize(path.as_ref()), content.into());
    }

    /// Returns the number of handles that have been opened and not yet dropped.
    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }
}

impl FileSystem for MemoryFs {
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        let data = self.files.get(&normalize(path)).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "file does not exist")
        })?;
        self.open_handles.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryHandle {
            cursor: Cursor::new(data.clone()),
            open_handles: Arc::clone(&self.open_handles),
        }))
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        Path::new("/").join(normalize(path))
    }
}

/// A readable snapshot of one in-memory file.
struct MemoryHandle {
    cursor: Cursor<Vec<u8>>,
    open_handles: Arc<AtomicUsize>,
}

impl Read for MemoryHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Drop for MemoryHandle {
    fn drop(&mut self) {
        self.open_handles.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Lexically normalizes a path into a relative key.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}
