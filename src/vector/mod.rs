//! Vector containers.
//!
//! Generic kernels only see vectors through [`ConstVector`] (read) and
//! [`Vector`] (write). Iteration yields the present `(index, element)` pairs in
//! ascending index order; a sparse vector simply omits its implicit zeros.

mod dense;
mod sparse;

pub use dense::DenseVector;
pub use sparse::SparseVector;

use num_traits::Zero;

use crate::scalar::{ConstScalar, Scalar};

/// Read access to a vector of scalar elements.
pub trait ConstVector {
    type Elem: Scalar;

    /// Ascending iterator over present `(index, element)` pairs.
    type Iter<'a>: Iterator<Item = (usize, &'a Self::Elem)>
    where
        Self: 'a;

    /// Logical length, including implicit zeros.
    fn dim(&self) -> usize;

    /// Element at `i`, or `None` when it is an implicit zero.
    ///
    /// # Panics
    ///
    /// If `i >= dim()`.
    fn get(&self, i: usize) -> Option<&Self::Elem>;

    fn iter(&self) -> Self::Iter<'_>;

    /// Value at `i`, zero when absent.
    fn value_at(&self, i: usize) -> <Self::Elem as ConstScalar>::Float {
        self.get(i).map_or_else(Zero::zero, ConstScalar::value)
    }
}

/// Write access to a vector of scalar elements.
pub trait Vector: ConstVector {
    /// Element at `i`, materializing an explicit zero if it is absent.
    ///
    /// # Panics
    ///
    /// If `i >= dim()`.
    fn at_mut(&mut self, i: usize) -> &mut Self::Elem;

    /// Element at `i` if present; never inserts.
    fn get_mut(&mut self, i: usize) -> Option<&mut Self::Elem>;

    /// Reset every present element, keeping allocations.
    fn reset(&mut self);
}

/// Store a plain value at `i`, without materializing a zero in a sparse vector.
pub(crate) fn store<V: Vector>(r: &mut V, i: usize, v: <V::Elem as ConstScalar>::Float) {
    if !v.is_zero() {
        r.at_mut(i).set_value(v);
    } else if let Some(e) = r.get_mut(i) {
        e.set_value(v);
    }
}
