use std::fmt::{self, Display};
use std::iter::Enumerate;
use std::ops::{Index, IndexMut};
use std::slice;

use num_traits::Zero;

use crate::error::Result;
use crate::scalar::{ConstScalar, Differentiable, Scalar};
use crate::seed;

use super::{ConstVector, Vector};

/// Contiguous vector; every index is present.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DenseVector<T> {
    data: Vec<T>,
}

impl<T: Scalar> DenseVector<T> {
    #[inline]
    pub fn from_vec(data: Vec<T>) -> Self {
        DenseVector { data }
    }

    /// `n` zeros.
    pub fn zeros(n: usize) -> Self {
        Self::from_fn(n, |_| T::Float::zero())
    }

    /// Constants built from plain values.
    pub fn from_values(values: &[T::Float]) -> Self {
        values.iter().map(|&v| T::from_value(v)).collect()
    }

    /// Constants `f(0), f(1), ..., f(n - 1)`.
    pub fn from_fn(n: usize, mut f: impl FnMut(usize) -> T::Float) -> Self {
        (0..n).map(|i| T::from_value(f(i))).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Plain values of all elements.
    pub fn values(&self) -> Vec<T::Float> {
        self.data.iter().map(ConstScalar::value).collect()
    }

    /// Elements `start..end` as a new vector. Derivative buffers are copied
    /// as they are, so the slice stays in the derivative space of `self`.
    pub fn slice(&self, start: usize, end: usize) -> Self {
        DenseVector::from_vec(self.data[start..end].to_vec())
    }

    /// Seed the elements as the independent variables of one derivative space.
    /// See [`variables`](crate::variables).
    pub fn variables(&mut self, order: usize) -> Result<()>
    where
        T: Differentiable,
    {
        seed::variables(order, &mut self.data)
    }
}

impl<T: Scalar> ConstVector for DenseVector<T> {
    type Elem = T;
    type Iter<'a>
        = Enumerate<slice::Iter<'a, T>>
    where
        T: 'a;

    #[inline]
    fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn get(&self, i: usize) -> Option<&T> {
        Some(&self.data[i])
    }

    #[inline]
    fn iter(&self) -> Self::Iter<'_> {
        self.data.iter().enumerate()
    }

    #[inline]
    fn value_at(&self, i: usize) -> T::Float {
        self.data[i].value()
    }
}

impl<T: Scalar> Vector for DenseVector<T> {
    #[inline]
    fn at_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }

    #[inline]
    fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        Some(&mut self.data[i])
    }

    fn reset(&mut self) {
        for x in &mut self.data {
            x.reset();
        }
    }
}

impl<T> Index<usize> for DenseVector<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T> IndexMut<usize> for DenseVector<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

impl<T> From<Vec<T>> for DenseVector<T> {
    #[inline]
    fn from(data: Vec<T>) -> Self {
        DenseVector { data }
    }
}

impl<T> FromIterator<T> for DenseVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        DenseVector {
            data: iter.into_iter().collect(),
        }
    }
}

impl<T: Display> Display for DenseVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, x) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{x}")?;
        }
        write!(f, "]")
    }
}
