use std::fmt::{self, Display};
use std::iter::Enumerate;
use std::ops::{Index, IndexMut};
use std::slice;

use log::debug;
use num_traits::{One, Zero};

use crate::error::{Error, Result};
use crate::linalg;
use crate::scalar::{ConstScalar, Differentiable, Scalar};
use crate::vector::{ConstVector, DenseVector};

use super::{ConstMatrix, Matrix};

/// Row-major matrix; every entry is present.
///
/// Besides its entries a dense matrix owns one scratch element that product
/// kernels writing into it reuse, so repeated products with differentiable
/// elements do not allocate once the scratch buffers are sized.
#[derive(Clone, Debug, Default)]
pub struct DenseMatrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
    scratch: Option<T>,
}

impl<T: Scalar> DenseMatrix<T> {
    /// Wrap row-major `data`, which must hold `rows * cols` elements.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::mismatch("from_vec", (rows * cols, 1), (data.len(), 1)));
        }
        Ok(DenseMatrix {
            rows,
            cols,
            data,
            scratch: None,
        })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_fn(rows, cols, |_, _| T::Float::zero())
    }

    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| {
            if i == j {
                T::Float::one()
            } else {
                T::Float::zero()
            }
        })
    }

    /// Constants `f(i, j)`.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T::Float) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(T::from_value(f(i, j)));
            }
        }
        DenseMatrix {
            rows,
            cols,
            data,
            scratch: None,
        }
    }

    /// Constants from equally long rows.
    pub fn from_rows(rows: &[Vec<T::Float>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(Error::mismatch("from_rows", (1, cols), (1, bad.len())));
        }
        Ok(Self::from_fn(rows.len(), cols, |i, j| rows[i][j]))
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                data.push(self.data[i * self.cols + j].clone());
            }
        }
        DenseMatrix {
            rows: self.cols,
            cols: self.rows,
            data,
            scratch: None,
        }
    }

    /// Plain values, one `Vec` per row.
    pub fn to_rows(&self) -> Vec<Vec<T::Float>> {
        (0..self.rows)
            .map(|i| self.row(i).iter().map(ConstScalar::value).collect())
            .collect()
    }

    /// Reshape to `rows×cols` zeros. Existing entries are discarded.
    pub(crate) fn reallocate(&mut self, rows: usize, cols: usize) {
        debug!(
            "reallocating result matrix from {}x{} to {}x{}",
            self.rows, self.cols, rows, cols
        );
        *self = Self::zeros(rows, cols);
    }

    /// Jacobian of `f` at `x` into `self`, reallocating `self` when its
    /// dimensions do not match `f(x).dim() × x.dim()`.
    ///
    /// `f` is evaluated once, on a copy of `x` seeded at order one.
    pub fn jacobian<X, S, Y, Fun>(&mut self, f: Fun, x: &X) -> Result<()>
    where
        X: ConstVector,
        X::Elem: ConstScalar<Float = T::Float>,
        S: Differentiable<Float = T::Float>,
        Y: ConstVector,
        Y::Elem: ConstScalar<Float = T::Float>,
        Fun: FnOnce(&DenseVector<S>) -> Y,
    {
        let y = linalg::eval_seeded(f, x, 1)?;
        let dims = (y.dim(), x.dim());
        if self.dims() != dims {
            self.reallocate(dims.0, dims.1);
        }
        linalg::write_jacobian(self, &y);
        Ok(())
    }

    /// Hessian of the scalar function `f` at `x` into `self`, reallocating
    /// `self` when it is not `x.dim() × x.dim()`.
    ///
    /// `f` is evaluated once, on a copy of `x` seeded at order two.
    pub fn hessian<X, S, Y, Fun>(&mut self, f: Fun, x: &X) -> Result<()>
    where
        X: ConstVector,
        X::Elem: ConstScalar<Float = T::Float>,
        S: Differentiable<Float = T::Float>,
        Y: ConstScalar<Float = T::Float>,
        Fun: FnOnce(&DenseVector<S>) -> Y,
    {
        let y = linalg::eval_seeded(f, x, 2)?;
        let n = x.dim();
        if self.dims() != (n, n) {
            self.reallocate(n, n);
        }
        linalg::write_hessian(self, &y, n);
        Ok(())
    }
}

/// Row-major iterator over a [`DenseMatrix`].
pub struct Iter<'a, T> {
    inner: Enumerate<slice::Iter<'a, T>>,
    cols: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = ((usize, usize), &'a T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (k, x) = self.inner.next()?;
        Some(((k / self.cols, k % self.cols), x))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T: Scalar> ConstMatrix for DenseMatrix<T> {
    type Elem = T;
    type Iter<'a>
        = Iter<'a, T>
    where
        T: 'a;

    #[inline]
    fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> Option<&T> {
        Some(&self[(i, j)])
    }

    fn iter(&self) -> Self::Iter<'_> {
        Iter {
            inner: self.data.iter().enumerate(),
            cols: self.cols,
        }
    }

    #[inline]
    fn value_at(&self, i: usize, j: usize) -> T::Float {
        self[(i, j)].value()
    }
}

impl<T: Scalar> Matrix for DenseMatrix<T> {
    #[inline]
    fn at_mut(&mut self, i: usize, j: usize) -> &mut T {
        &mut self[(i, j)]
    }

    #[inline]
    fn get_mut(&mut self, i: usize, j: usize) -> Option<&mut T> {
        Some(&mut self[(i, j)])
    }

    fn reset(&mut self) {
        for x in &mut self.data {
            x.reset();
        }
    }

    fn take_scratch(&mut self) -> T {
        self.scratch
            .take()
            .unwrap_or_else(|| T::from_value(T::Float::zero()))
    }

    fn restore_scratch(&mut self, t: T) {
        self.scratch = Some(t);
    }
}

impl<T> Index<(usize, usize)> for DenseMatrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        assert!(
            i < self.rows && j < self.cols,
            "index ({i}, {j}) out of range for {}x{} matrix",
            self.rows,
            self.cols
        );
        &self.data[i * self.cols + j]
    }
}

impl<T> IndexMut<(usize, usize)> for DenseMatrix<T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        assert!(
            i < self.rows && j < self.cols,
            "index ({i}, {j}) out of range for {}x{} matrix",
            self.rows,
            self.cols
        );
        &mut self.data[i * self.cols + j]
    }
}

impl<T: PartialEq> PartialEq for DenseMatrix<T> {
    /// Compares shape and entries; the scratch element is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.data == other.data
    }
}

impl<T: Display> Display for DenseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[")?;
        for i in 0..self.rows {
            write!(f, "  [")?;
            for j in 0..self.cols {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.data[i * self.cols + j])?;
            }
            writeln!(f, "]")?;
        }
        write!(f, "]")
    }
}
