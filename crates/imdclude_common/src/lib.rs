//! Shared foundational types used across the imdclude crates.
//!
//! This crate provides the [`ErrorGroup`] aggregator used by batch operations
//! that must not let one failure cancel its siblings, and [`ContentHash`] for
//! fingerprinting backed-up document content.

#![warn(missing_docs)]

pub mod error_group;
pub mod hash;

pub use error_group::ErrorGroup;
pub use hash::ContentHash;
