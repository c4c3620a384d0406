//! Error types for vector, keyspace and store operations.

use thiserror::Error;

/// Errors raised by the core. None of them are transient; they either signal a
/// broken caller contract or describe the population state of a keyspace.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Two vectors, or a vector and its target keyspace, disagree on dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The dimension required by the receiver.
        expected: usize,
        /// The dimension that was supplied.
        actual: usize,
    },

    /// Indexed access outside `[0, len)`.
    #[error("index {index} out of range for length {len}")]
    OutOfRange {
        /// The requested index.
        index: usize,
        /// The length of the indexed sequence.
        len: usize,
    },

    /// A search was run against a keyspace holding no vectors.
    #[error("keyspace '{0}' is empty")]
    EmptyCollection(String),

    /// No keyspace with the given name is registered.
    #[error("keyspace '{0}' not found")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fails with [`Error::DimensionMismatch`] unless both dimensions agree.
pub(crate) fn check_dimension(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::DimensionMismatch { expected, actual });
    }
    Ok(())
}
