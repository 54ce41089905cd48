//! The binary header written in front of every backup's content.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! [2B magic][4B timestamp][4B id len][id][4B path len][original path][content...]
//! ```

use std::io::{self, Read, Write};

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::error::HeaderError;

/// Magic number identifying an imdclude backup file.
pub const BACKUP_MAGIC: u16 = 0x3532;

/// Length of generated backup IDs.
const ID_LEN: usize = 10;

/// Longest ID or path accepted when decoding. Anything larger is corruption.
const MAX_FIELD_LEN: u32 = 64 * 1024;

/// Size of the fixed-width part of the header.
const FIXED_LEN: usize = 2 + 4 + 4 + 4;

/// Header prepended to the content of every backup file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupHeader {
    /// Format sentinel; [`BACKUP_MAGIC`] for files this crate writes.
    pub magic: u16,
    /// Creation time in unix seconds.
    pub timestamp: u32,
    /// Short unique ID, generated when the header is written.
    pub id: String,
    /// Absolute path of the document that was backed up.
    pub original_path: String,
}

impl BackupHeader {
    /// Creates a header for a new backup. The ID is assigned by [`write_to`](Self::write_to).
    pub fn new(original_path: impl Into<String>, timestamp: u32) -> Self {
        Self {
            magic: BACKUP_MAGIC,
            timestamp,
            id: String::new(),
            original_path: original_path.into(),
        }
    }

    /// Generates a fresh ID, stores it in `self`, and writes the header.
    pub fn write_to<W: Write>(&mut self, w: &mut W) -> io::Result<()> {
        self.id = generate_id();

        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.extend_from_slice(&self.magic.to_le_bytes());
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        buf.extend_from_slice(&(self.id.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.id.as_bytes());
        buf.extend_from_slice(&(self.original_path.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.original_path.as_bytes());
        w.write_all(&buf)
    }

    /// Reads a header written by this crate, rejecting any other magic.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, HeaderError> {
        Self::read_with_magic(r, BACKUP_MAGIC)
    }

    /// Reads a header, checking the magic against `expected` before
    /// decoding anything else.
    pub fn read_with_magic<R: Read>(r: &mut R, expected: u16) -> Result<Self, HeaderError> {
        let magic = u16::from_le_bytes(read_array(r)?);
        if magic != expected {
            return Err(HeaderError::BadMagic {
                expected,
                found: magic,
            });
        }

        let timestamp = u32::from_le_bytes(read_array(r)?);
        let id = read_field(r, "id")?;
        let original_path = read_field(r, "original path")?;

        Ok(Self {
            magic,
            timestamp,
            id,
            original_path,
        })
    }

    /// Number of bytes this header occupies on disk.
    pub fn encoded_len(&self) -> usize {
        FIXED_LEN + self.id.len() + self.original_path.len()
    }
}

/// Generates a short random identifier.
fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}

fn read_exact<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<(), HeaderError> {
    r.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => HeaderError::Truncated,
        _ => HeaderError::Io(e),
    })
}

fn read_array<R: Read, const N: usize>(r: &mut R) -> Result<[u8; N], HeaderError> {
    let mut buf = [0u8; N];
    read_exact(r, &mut buf)?;
    Ok(buf)
}

/// Reads a 4-byte length prefix followed by that many bytes of UTF-8.
fn read_field<R: Read>(r: &mut R, field: &'static str) -> Result<String, HeaderError> {
    let len = u32::from_le_bytes(read_array(r)?);
    if len > MAX_FIELD_LEN {
        return Err(HeaderError::FieldTooLong {
            field,
            len,
            max: MAX_FIELD_LEN,
        });
    }
    let mut bytes = vec![0u8; len as usize];
    read_exact(r, &mut bytes)?;
    String::from_utf8(bytes).map_err(|_| HeaderError::InvalidUtf8 { field })
}
