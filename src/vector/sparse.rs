use std::collections::btree_map::{self, BTreeMap};
use std::fmt::{self, Display};
use std::iter::Map;

use num_traits::Zero;

use crate::scalar::Scalar;

use super::{ConstVector, Vector};

/// Vector storing only explicitly set entries; absent indices are zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseVector<T> {
    n: usize,
    entries: BTreeMap<usize, T>,
}

impl<T: Scalar> SparseVector<T> {
    /// All-zero vector of dimension `n` with no stored entries.
    pub fn new(n: usize) -> Self {
        SparseVector {
            n,
            entries: BTreeMap::new(),
        }
    }

    /// # Panics
    ///
    /// If an index is out of range.
    pub fn from_entries(n: usize, entries: impl IntoIterator<Item = (usize, T)>) -> Self {
        let mut v = Self::new(n);
        for (i, x) in entries {
            assert!(i < n, "index {i} out of range for sparse vector of dimension {n}");
            v.entries.insert(i, x);
        }
        v
    }

    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Drop every stored entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

type Pair<'a, T> = (&'a usize, &'a T);

fn by_index<'a, T>((i, x): Pair<'a, T>) -> (usize, &'a T) {
    (*i, x)
}

impl<T: Scalar> ConstVector for SparseVector<T> {
    type Elem = T;
    type Iter<'a>
        = Map<btree_map::Iter<'a, usize, T>, fn(Pair<'a, T>) -> (usize, &'a T)>
    where
        T: 'a;

    #[inline]
    fn dim(&self) -> usize {
        self.n
    }

    fn get(&self, i: usize) -> Option<&T> {
        assert!(i < self.n, "index {i} out of range for sparse vector of dimension {}", self.n);
        self.entries.get(&i)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.entries.iter().map(by_index as fn(Pair<'_, T>) -> (usize, &T))
    }
}

impl<T: Scalar> Vector for SparseVector<T> {
    fn at_mut(&mut self, i: usize) -> &mut T {
        assert!(i < self.n, "index {i} out of range for sparse vector of dimension {}", self.n);
        self.entries
            .entry(i)
            .or_insert_with(|| T::from_value(T::Float::zero()))
    }

    fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        assert!(i < self.n, "index {i} out of range for sparse vector of dimension {}", self.n);
        self.entries.get_mut(&i)
    }

    fn reset(&mut self) {
        for x in self.entries.values_mut() {
            x.reset();
        }
    }
}

impl<T: Display> Display for SparseVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (k, (i, x)) in self.entries.iter().enumerate() {
            if k > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{i}: {x}")?;
        }
        write!(f, "}}")
    }
}
