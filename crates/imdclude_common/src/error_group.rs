//! Aggregation of independent failures from a batch operation.

use std::fmt;

/// Errors collected from a batch of independent sub-operations.
///
/// Used wherever one failing item must not cancel its siblings: every
/// failure is pushed here and the caller surfaces them together once the
/// batch is done. An empty group means the batch succeeded.
#[derive(Debug)]
pub struct ErrorGroup<E> {
    errors: Vec<E>,
}

impl<E> ErrorGroup<E> {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Records one failure, preserving collection order.
    pub fn push(&mut self, error: E) {
        self.errors.push(error);
    }

    /// Returns `true` if nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of collected errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the collected errors in collection order.
    pub fn errors(&self) -> &[E] {
        &self.errors
    }

    /// Converts the group into `Ok(())` when empty, or `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl<E> Default for ErrorGroup<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: fmt::Display> fmt::Display for ErrorGroup<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.len() {
            1 => writeln!(f, "1 error occurred:")?,
            n => writeln!(f, "{n} errors occurred:")?,
        }
        for err in &self.errors {
            writeln!(f, "\t* {err}")?;
        }
        Ok(())
    }
}

impl<E: std::error::Error> std::error::Error for ErrorGroup<E> {}
