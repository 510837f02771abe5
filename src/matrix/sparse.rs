use std::collections::btree_map::{self, BTreeMap};
use std::iter::Map;

use num_traits::Zero;

use crate::scalar::Scalar;

use super::{ConstMatrix, Matrix};

/// Matrix storing only explicitly set entries, ordered row-major.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseMatrix<T> {
    rows: usize,
    cols: usize,
    entries: BTreeMap<(usize, usize), T>,
}

impl<T: Scalar> SparseMatrix<T> {
    pub fn new(rows: usize, cols: usize) -> Self {
        SparseMatrix {
            rows,
            cols,
            entries: BTreeMap::new(),
        }
    }

    /// # Panics
    ///
    /// If an index is out of range.
    pub fn from_entries(
        rows: usize,
        cols: usize,
        entries: impl IntoIterator<Item = ((usize, usize), T)>,
    ) -> Self {
        let mut m = Self::new(rows, cols);
        for ((i, j), x) in entries {
            m.check(i, j);
            m.entries.insert((i, j), x);
        }
        m
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    fn check(&self, i: usize, j: usize) {
        assert!(
            i < self.rows && j < self.cols,
            "index ({i}, {j}) out of range for {}x{} sparse matrix",
            self.rows,
            self.cols
        );
    }
}

type Pair<'a, T> = (&'a (usize, usize), &'a T);

fn by_index<'a, T>((ij, x): Pair<'a, T>) -> ((usize, usize), &'a T) {
    (*ij, x)
}

impl<T: Scalar> ConstMatrix for SparseMatrix<T> {
    type Elem = T;
    type Iter<'a>
        = Map<btree_map::Iter<'a, (usize, usize), T>, fn(Pair<'a, T>) -> ((usize, usize), &'a T)>
    where
        T: 'a;

    #[inline]
    fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn get(&self, i: usize, j: usize) -> Option<&T> {
        self.check(i, j);
        self.entries.get(&(i, j))
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.entries
            .iter()
            .map(by_index as fn(Pair<'_, T>) -> ((usize, usize), &T))
    }
}

impl<T: Scalar> Matrix for SparseMatrix<T> {
    fn at_mut(&mut self, i: usize, j: usize) -> &mut T {
        self.check(i, j);
        self.entries
            .entry((i, j))
            .or_insert_with(|| T::from_value(T::Float::zero()))
    }

    fn get_mut(&mut self, i: usize, j: usize) -> Option<&mut T> {
        self.check(i, j);
        self.entries.get_mut(&(i, j))
    }

    fn reset(&mut self) {
        for x in self.entries.values_mut() {
            x.reset();
        }
    }
}
