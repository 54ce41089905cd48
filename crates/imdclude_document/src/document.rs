//! The document model: lines, include directives, and the owned source handle.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use imdclude_common::ErrorGroup;
use imdclude_source::{find_include, merge_lines, FileSystem, LineReader, ReaderOptions};

use crate::error::DocumentError;

/// An `#include` directive discovered while parsing a [`Document`].
#[derive(Debug)]
pub struct Include {
    /// The path as written in the directive, relative to the lookup root.
    pub target_path: PathBuf,
    /// Base name of `target_path`, for diagnostics.
    pub display_name: String,
    /// Name of the document that declared the directive.
    pub parent_name: String,
    /// 1-based position of the directive in the parent's pre-splice lines.
    pub line_position: usize,
    /// The parsed target, present only once it was opened successfully.
    pub child: Option<Document>,
}

impl Include {
    fn new(target: &str, parent_name: &str, line_position: usize) -> Self {
        let target_path = PathBuf::from(target);
        Self {
            display_name: base_name(&target_path),
            target_path,
            parent_name: parent_name.to_string(),
            line_position,
            child: None,
        }
    }
}

/// A text document split into lines, with the include directives it contains.
///
/// The document exclusively owns the handle it was opened from. Closing it
/// (explicitly or by dropping it) releases that handle and every child
/// document's handle.
pub struct Document {
    name: String,
    path: PathBuf,
    reader: Option<Box<dyn Read>>,
    lines: Vec<String>,
    includes: Vec<Include>,
    ends_with_newline: bool,
    pub(crate) resolved: bool,
}

impl Document {
    /// Opens `path` through `fs` without parsing it yet.
    pub fn open(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let reader = fs
            .open(path)
            .map_err(|e| DocumentError::from_open(path.to_path_buf(), e))?;
        Ok(Self::from_reader(base_name(path), fs.absolute(path), reader))
    }

    /// Opens and parses `path`, failing if any line could not be read.
    pub fn load(
        fs: &dyn FileSystem,
        path: impl AsRef<Path>,
        options: &ReaderOptions,
    ) -> Result<Self, DocumentError> {
        let mut doc = Self::open(fs, path)?;
        doc.parse(options)?;
        Ok(doc)
    }

    /// Wraps an already opened reader.
    pub fn from_reader(name: impl Into<String>, path: PathBuf, reader: Box<dyn Read>) -> Self {
        Self {
            name: name.into(),
            path,
            reader: Some(reader),
            lines: Vec::new(),
            includes: Vec::new(),
            ends_with_newline: false,
            resolved: false,
        }
    }

    /// Reads the remaining content of the source handle into lines.
    ///
    /// Every line is kept verbatim; lines carrying a directive also record an
    /// [`Include`]. Per-line failures do not stop the parse: they are
    /// collected and returned together at the end, and whatever was read
    /// stays available.
    pub fn parse(&mut self, options: &ReaderOptions) -> Result<(), DocumentError> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(());
        };

        let mut errors = ErrorGroup::new();
        let mut lines = LineReader::with_options(reader, *options);
        for line in lines.by_ref() {
            match line {
                Ok(line) => {
                    if let Some(target) = find_include(&line) {
                        let position = self.lines.len() + 1;
                        self.includes.push(Include::new(target, &self.name, position));
                    }
                    self.lines.push(line);
                }
                Err(source) => errors.push(DocumentError::Line {
                    name: self.name.clone(),
                    source,
                }),
            }
        }
        self.ends_with_newline = lines.ended_with_newline();

        errors.into_result().map_err(DocumentError::from)
    }

    /// Display name of the document (its base file name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path the document was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The include directives, in discovery order.
    pub fn includes(&self) -> &[Include] {
        &self.includes
    }

    pub(crate) fn includes_mut(&mut self) -> &mut [Include] {
        &mut self.includes
    }

    /// Returns `true` while the source handle has not been released.
    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    /// Returns `true` once includes have been resolved and spliced.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Releases the source handle, then every child document's handles.
    ///
    /// Includes that failed to open own nothing. Calling this twice is harmless.
    pub fn close(&mut self) {
        self.reader = None;
        for include in &mut self.includes {
            if let Some(child) = include.child.as_mut() {
                child.close();
            }
        }
    }

    /// Returns the lines joined with `\n`, without a trailing separator.
    pub fn content(&self) -> Vec<u8> {
        merge_lines(&self.lines)
    }

    /// Releases the source handle and writes the current lines to `writer`.
    ///
    /// A trailing newline is written when the source ended with one.
    pub fn write_to<W: Write>(&mut self, writer: &mut W) -> io::Result<usize> {
        self.reader = None;
        let mut content = self.content();
        if self.ends_with_newline && !content.is_empty() {
            content.push(b'\n');
        }
        writer.write_all(&content)?;
        writer.flush()?;
        Ok(content.len())
    }

    /// Replaces each resolved directive line with its child's lines.
    ///
    /// Include positions refer to the pre-splice lines, so every splice is
    /// shifted by the net growth of the splices before it.
    pub(crate) fn splice_includes(&mut self) {
        let mut offset: isize = 0;
        for include in &self.includes {
            let Some(child) = include.child.as_ref() else {
                continue;
            };
            let at = (include.line_position as isize - 1 + offset) as usize;
            tracing::debug!(
                "[{}] replacing line {} with {}'s content",
                self.name,
                include.line_position,
                include.display_name
            );
            self.lines.splice(at..=at, child.lines.iter().cloned());
            offset += child.lines.len() as isize - 1;
        }
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("open", &self.is_open())
            .field("lines", &self.lines.len())
            .field("includes", &self.includes)
            .finish()
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use imdclude_source::{LineError, MemoryFs};

    const DOC_WITH_INCLUDES: &str = "
# A regular markdown document

#include \"mddocsdir/othermarkdowndoc.md\"

## Some sub headings
> a nice inline quote

#include \"mddocsdir/yetanotherothermarkdowndoc.md\"
#include \"mddocsdir/multilineothermarkdowndoc.md\"

### Another sub header
#include \"childocwithinsamedirectoryasroot.md\"
";

    fn fixture() -> MemoryFs {
        MemoryFs::new()
            .with_file("emptydoc.md", "")
            .with_file("docwithincludes.md", DOC_WITH_INCLUDES)
            .with_file("plain.md", "first\nsecond\nthird\n")
    }

    fn load(fs: &MemoryFs, path: &str) -> Document {
        Document::load(fs, path, &ReaderOptions::default()).unwrap()
    }

    #[test]
    fn open_empty_document() {
        let fs = fixture();
        let doc = load(&fs, "emptydoc.md");
        assert!(doc.lines().is_empty());
        assert!(doc.includes().is_empty());
    }

    #[test]
    fn open_missing_document_names_path() {
        let fs = fixture();
        let err = Document::open(&fs, "doesnotexist.md").unwrap_err();
        assert!(matches!(err, DocumentError::NotFound { .. }));
        assert!(err.to_string().contains("doesnotexist.md"));
    }

    #[test]
    fn name_and_path() {
        let fs = fixture();
        let doc = Document::open(&fs, "./plain.md").unwrap();
        assert_eq!(doc.name(), "plain.md");
        assert_eq!(doc.path(), Path::new("/plain.md"));
    }

    #[test]
    fn document_without_includes_keeps_lines() {
        let fs = fixture();
        let doc = load(&fs, "plain.md");
        assert_eq!(doc.lines(), ["first", "second", "third"]);
        assert!(doc.includes().is_empty());
    }

    #[test]
    fn includes_are_found_in_scan_order() {
        let fs = fixture();
        let doc = load(&fs, "docwithincludes.md");
        let found: Vec<_> = doc
            .includes()
            .iter()
            .map(|i| {
                (
                    i.target_path.to_string_lossy().into_owned(),
                    i.display_name.as_str(),
                    i.parent_name.as_str(),
                    i.line_position,
                )
            })
            .collect();
        assert_eq!(
            found,
            vec![
                (
                    "mddocsdir/othermarkdowndoc.md".to_string(),
                    "othermarkdowndoc.md",
                    "docwithincludes.md",
                    4
                ),
                (
                    "mddocsdir/yetanotherothermarkdowndoc.md".to_string(),
                    "yetanotherothermarkdowndoc.md",
                    "docwithincludes.md",
                    9
                ),
                (
                    "mddocsdir/multilineothermarkdowndoc.md".to_string(),
                    "multilineothermarkdowndoc.md",
                    "docwithincludes.md",
                    10
                ),
                (
                    "childocwithinsamedirectoryasroot.md".to_string(),
                    "childocwithinsamedirectoryasroot.md",
                    "docwithincludes.md",
                    13
                ),
            ]
        );
        assert!(doc.includes().iter().all(|i| i.child.is_none()));
    }

    #[test]
    fn directive_lines_are_kept_verbatim() {
        let fs = fixture();
        let doc = load(&fs, "docwithincludes.md");
        assert_eq!(doc.lines()[3], "#include \"mddocsdir/othermarkdowndoc.md\"");
        assert_eq!(doc.lines().len(), 13);
    }

    #[test]
    fn too_long_line_is_collected_and_parse_continues() {
        let fs = MemoryFs::new().with_file("big.md", format!("a\n{}\n#include \"x.md\"", "z".repeat(64)));
        let mut doc = Document::open(&fs, "big.md").unwrap();
        let options = ReaderOptions {
            buffer_capacity: 8,
            max_line_bytes: 32,
        };
        let err = doc.parse(&options).unwrap_err();
        assert_eq!(err.errors().len(), 1);
        assert!(err.to_string().contains("line 2"));
        assert_eq!(doc.lines(), ["a", "#include \"x.md\""]);
        assert_eq!(doc.includes()[0].line_position, 2);
    }

    #[test]
    fn non_utf8_line_fails_the_load() {
        let fs = MemoryFs::new().with_file("latin1.md", b"caf\xe9\n".to_vec());
        let err = Document::load(&fs, "latin1.md", &ReaderOptions::default()).unwrap_err();
        assert_eq!(err.errors().len(), 1);
        assert!(matches!(
            err.errors()[0],
            DocumentError::Line {
                source: LineError::InvalidUtf8 { line: 1 },
                ..
            }
        ));
    }

    #[test]
    fn close_releases_handle_once() {
        let fs = fixture();
        let mut doc = Document::open(&fs, "plain.md").unwrap();
        assert_eq!(fs.open_handles(), 1);
        assert!(doc.is_open());
        doc.close();
        doc.close();
        assert!(!doc.is_open());
        assert_eq!(fs.open_handles(), 0);
    }

    #[test]
    fn drop_releases_handle() {
        let fs = fixture();
        let doc = Document::open(&fs, "plain.md").unwrap();
        drop(doc);
        assert_eq!(fs.open_handles(), 0);
    }

    #[test]
    fn write_preserves_trailing_newline() {
        let fs = fixture();
        let mut doc = load(&fs, "plain.md");
        let mut out = Vec::new();
        let written = doc.write_to(&mut out).unwrap();
        assert_eq!(out, b"first\nsecond\nthird\n");
        assert_eq!(written, out.len());
        assert!(!doc.is_open());
    }

    #[test]
    fn write_without_trailing_newline() {
        let fs = MemoryFs::new().with_file("a.md", "one\ntwo");
        let mut doc = load(&fs, "a.md");
        let mut out = Vec::new();
        doc.write_to(&mut out).unwrap();
        assert_eq!(out, b"one\ntwo");
    }

    #[test]
    fn content_joins_lines() {
        let fs = fixture();
        let doc = load(&fs, "plain.md");
        assert_eq!(doc.content(), b"first\nsecond\nthird");
    }
}
