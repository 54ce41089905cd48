//! Error types for opening, parsing, and resolving documents.

use std::path::PathBuf;

use imdclude_common::ErrorGroup;
use imdclude_source::LineError;

/// Errors that can occur while opening, parsing, or resolving a document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The document or include target does not exist.
    #[error("file does not exist: path: {path}")]
    NotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    /// The document exists but could not be opened.
    #[error("unable to open {path}: {source}")]
    Open {
        /// The path that was requested.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A single line could not be read.
    #[error("{name}: {source}")]
    Line {
        /// Name of the document being parsed.
        name: String,
        /// The per-line failure.
        source: LineError,
    },

    /// Following an include would re-enter a document already being resolved.
    #[error("include cycle detected: {chain}")]
    IncludeCycle {
        /// The chain of documents, root first, ending with the repeated one.
        chain: String,
    },

    /// Several independent failures from one batch.
    #[error("{0}")]
    Aggregate(ErrorGroup<DocumentError>),
}

impl DocumentError {
    /// Maps an open failure onto `NotFound` or `Open`.
    pub(crate) fn from_open(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Open { path, source }
        }
    }

    /// Returns the underlying errors of an aggregate, or `self` alone.
    pub fn errors(&self) -> Vec<&DocumentError> {
        match self {
            Self::Aggregate(group) => group.errors().iter().collect(),
            other => vec![other],
        }
    }
}

impl From<ErrorGroup<DocumentError>> for DocumentError {
    fn from(group: ErrorGroup<DocumentError>) -> Self {
        Self::Aggregate(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_path() {
        let err = DocumentError::from_open(
            PathBuf::from("doesnotexist.md"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, DocumentError::NotFound { .. }));
        assert_eq!(err.to_string(), "file does not exist: path: doesnotexist.md");
    }

    #[test]
    fn other_open_failures_keep_source() {
        let err = DocumentError::from_open(
            PathBuf::from("locked.md"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("locked.md"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn line_error_display() {
        let err = DocumentError::Line {
            name: "big.md".to_string(),
            source: LineError::TooLong { line: 3, limit: 10 },
        };
        assert_eq!(err.to_string(), "big.md: line 3: line exceeds 10 bytes");
    }

    #[test]
    fn aggregate_renders_each_error() {
        let mut group = ErrorGroup::new();
        group.push(DocumentError::NotFound {
            path: PathBuf::from("a.md"),
        });
        group.push(DocumentError::NotFound {
            path: PathBuf::from("b.md"),
        });
        let err = DocumentError::from(group);
        let msg = err.to_string();
        assert!(msg.starts_with("2 errors occurred:"));
        assert!(msg.contains("\t* file does not exist: path: a.md"));
        assert!(msg.contains("\t* file does not exist: path: b.md"));
        assert_eq!(err.errors().len(), 2);
    }
}
