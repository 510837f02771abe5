//! Error types for numbat.

use thiserror::Error;

/// Result type alias using numbat's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable failures of container kernels and variable seeding.
///
/// Numeric domain problems (`log` of a negative number, `0/0`) are not errors;
/// they propagate as NaN/Inf. Out-of-range indices are programmer errors and
/// panic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Operand or result shapes are incompatible. Vectors report `(dim, 1)`.
    #[error("dimension mismatch in {op}: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        /// Kernel that rejected its arguments.
        op: &'static str,
        /// Shape the kernel required.
        expected: (usize, usize),
        /// Shape it was given.
        found: (usize, usize),
    },

    /// Differentiation order above 2 was requested.
    #[error("order `{0}` not supported, derivatives are tracked up to order 2")]
    UnsupportedOrder(usize),

    /// An element being seeded already belongs to a derivative space of a
    /// different size. Seed one combined vector and slice it afterwards.
    #[error(
        "element {index} belongs to a derivative space of {found} variables, \
         cannot seed it into a space of {expected}"
    )]
    DerivativeSpaceMismatch {
        /// Position of the offending element.
        index: usize,
        /// Size of the space being seeded.
        expected: usize,
        /// Size of the space the element already belongs to.
        found: usize,
    },

    /// A square matrix was required.
    #[error("matrix is not square: {rows}x{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },
}

impl Error {
    pub(crate) fn mismatch(op: &'static str, expected: (usize, usize), found: (usize, usize)) -> Self {
        Error::DimensionMismatch {
            op,
            expected,
            found,
        }
    }
}
