//! Recursive include resolution.

use std::path::{Path, PathBuf};

use imdclude_common::ErrorGroup;
use imdclude_source::{FileSystem, ReaderOptions};

use crate::document::Document;
use crate::error::DocumentError;

/// Expands every `#include` of a document, recursively, into one flat document.
///
/// Include targets are looked up relative to `lookup_root` (not the declaring
/// document's directory) through the given [`FileSystem`]. Resolution is
/// best-effort: an include that cannot be opened, parsed, or resolved is
/// reported and left in place, while its siblings are still spliced.
pub struct Resolver<'fs> {
    fs: &'fs dyn FileSystem,
    lookup_root: PathBuf,
    options: ReaderOptions,
}

impl<'fs> Resolver<'fs> {
    /// Creates a resolver reading includes from `lookup_root` through `fs`.
    pub fn new(fs: &'fs dyn FileSystem, lookup_root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            lookup_root: lookup_root.into(),
            options: ReaderOptions::default(),
        }
    }

    /// Sets the line reader options used when parsing includes.
    pub fn with_options(mut self, options: ReaderOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolves all includes of `doc` in place.
    ///
    /// Descendants are resolved before being spliced into their parent, so
    /// nesting of any depth collapses in one call. On error, `doc` still
    /// holds every include that did resolve; the returned error aggregates
    /// the ones that did not, including failures deeper in the tree.
    pub fn resolve(&self, doc: &mut Document) -> Result<(), DocumentError> {
        let mut chain = vec![doc.path().to_path_buf()];
        self.resolve_nested(doc, &mut chain)
    }

    fn resolve_nested(
        &self,
        doc: &mut Document,
        chain: &mut Vec<PathBuf>,
    ) -> Result<(), DocumentError> {
        if doc.resolved {
            return Ok(());
        }
        if doc.includes().is_empty() {
            tracing::debug!("[{}] no includes found", doc.name());
            doc.resolved = true;
            return Ok(());
        }

        let mut errors = ErrorGroup::new();
        self.open_all(doc, chain, &mut errors);

        for include in doc.includes_mut() {
            let Some(child) = include.child.as_mut() else {
                continue;
            };
            chain.push(child.path().to_path_buf());
            if let Err(e) = self.resolve_nested(child, chain) {
                errors.push(e);
            }
            chain.pop();
        }

        doc.splice_includes();
        doc.resolved = true;

        errors.into_result().map_err(DocumentError::from)
    }

    /// Opens and parses every direct include, recording failures in `errors`.
    fn open_all(&self, doc: &mut Document, chain: &[PathBuf], errors: &mut ErrorGroup<DocumentError>) {
        let name = doc.name().to_string();
        for include in doc.includes_mut() {
            let target = self.lookup_root.join(&include.target_path);
            tracing::debug!("[{}] opening include: {}", name, target.display());

            let absolute = self.fs.absolute(&target);
            if chain.contains(&absolute) {
                errors.push(DocumentError::IncludeCycle {
                    chain: describe_chain(chain, &absolute),
                });
                continue;
            }

            match Document::load(self.fs, &target, &self.options) {
                Ok(child) => include.child = Some(child),
                Err(e) => errors.push(e),
            }
        }
    }
}

fn describe_chain(chain: &[PathBuf], repeated: &Path) -> String {
    chain
        .iter()
        .map(|p| p.as_path())
        .chain(std::iter::once(repeated))
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
