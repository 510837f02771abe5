//! Matrix containers.
//!
//! The matrix counterpart of [`crate::vector`]: present entries are visited
//! in row-major order, absent entries of a sparse matrix are zero.

mod dense;
mod sparse;

pub use dense::DenseMatrix;
pub use sparse::SparseMatrix;

use num_traits::Zero;

use crate::scalar::{ConstScalar, Scalar};

/// Read access to a matrix of scalar elements.
pub trait ConstMatrix {
    type Elem: Scalar;

    /// Row-major iterator over present `((row, col), element)` pairs.
    type Iter<'a>: Iterator<Item = ((usize, usize), &'a Self::Elem)>
    where
        Self: 'a;

    /// `(rows, cols)`
    fn dims(&self) -> (usize, usize);

    /// # Panics
    ///
    /// If `(i, j)` is out of range.
    fn get(&self, i: usize, j: usize) -> Option<&Self::Elem>;

    fn iter(&self) -> Self::Iter<'_>;

    fn value_at(&self, i: usize, j: usize) -> <Self::Elem as ConstScalar>::Float {
        self.get(i, j).map_or_else(Zero::zero, ConstScalar::value)
    }
}

/// Write access to a matrix of scalar elements.
pub trait Matrix: ConstMatrix {
    /// # Panics
    ///
    /// If `(i, j)` is out of range.
    fn at_mut(&mut self, i: usize, j: usize) -> &mut Self::Elem;

    fn get_mut(&mut self, i: usize, j: usize) -> Option<&mut Self::Elem>;

    /// Reset every present element, keeping allocations.
    fn reset(&mut self);

    /// Borrow a temporary for product kernels. Matrices that keep one hand
    /// out their own so its buffers survive between calls.
    fn take_scratch(&mut self) -> Self::Elem {
        Self::Elem::from_value(Zero::zero())
    }

    /// Give back a temporary obtained from [`take_scratch`](Matrix::take_scratch).
    fn restore_scratch(&mut self, _t: Self::Elem) {}
}

/// Store a plain value at `(i, j)`, without materializing a zero in a sparse
/// matrix.
pub(crate) fn store<M: Matrix>(r: &mut M, i: usize, j: usize, v: <M::Elem as ConstScalar>::Float) {
    if !v.is_zero() {
        r.at_mut(i, j).set_value(v);
    } else if let Some(e) = r.get_mut(i, j) {
        e.set_value(v);
    }
}
