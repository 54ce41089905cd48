//! Documents and recursive `#include` resolution.
//!
//! A [`Document`] is parsed from a [`FileSystem`](imdclude_source::FileSystem)
//! into lines plus the [`Include`] directives found among them. The
//! [`Resolver`] then opens every include, resolves it recursively, and splices
//! the child's lines over the directive so the root becomes one flat document.

#![warn(missing_docs)]

pub mod document;
pub mod error;
pub mod resolve;

pub use document::{Document, Include};
pub use error::DocumentError;
pub use resolve::Resolver;
