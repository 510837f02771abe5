//! ndarray adapters.
//!
//! Conversions between the dense containers and `Array1`/`Array2`, plus
//! wrappers around [`crate::api`] that accept an `Array1<F>` point.

use ndarray::{Array1, Array2};

use crate::api;
use crate::float::Float;
use crate::matrix::DenseMatrix;
use crate::real::Real;
use crate::scalar::Scalar;
use crate::vector::DenseVector;

impl<T: Scalar> DenseVector<T> {
    /// Constants built from the entries of `a`.
    pub fn from_array(a: &Array1<T::Float>) -> Self {
        a.iter().map(|&v| T::from_value(v)).collect()
    }

    /// Plain values as an `Array1`.
    pub fn to_array(&self) -> Array1<T::Float> {
        Array1::from_vec(self.values())
    }
}

impl<T: Scalar> DenseMatrix<T> {
    /// Constants built from the entries of `a`.
    pub fn from_array(a: &Array2<T::Float>) -> Self {
        let (rows, cols) = a.dim();
        Self::from_fn(rows, cols, |i, j| a[[i, j]])
    }

    /// Plain values as an `Array2`.
    pub fn to_array(&self) -> Array2<T::Float> {
        let (rows, cols) = (self.rows(), self.cols());
        Array2::from_shape_fn((rows, cols), |(i, j)| self[(i, j)].value())
    }
}

/// Value and gradient, with the gradient as an `Array1`.
pub fn gradient_ndarray<F: Float>(
    f: impl FnOnce(&[Real<F>]) -> Real<F>,
    x: &Array1<F>,
) -> (F, Array1<F>) {
    let (v, g) = api::gradient(f, &x.to_vec());
    (v, Array1::from_vec(g))
}

/// Jacobian `J[i][j] = ∂f_i/∂x_j` as an `Array2`.
pub fn jacobian_ndarray<F: Float>(
    f: impl FnOnce(&[Real<F>]) -> Vec<Real<F>>,
    x: &Array1<F>,
) -> Array2<F> {
    let n = x.len();
    let (_, jac) = api::jacobian(f, &x.to_vec());
    Array2::from_shape_fn((jac.len(), n), |(i, j)| jac[i][j])
}

/// Value, gradient and Hessian as `(F, Array1, Array2)`.
pub fn hessian_ndarray<F: Float>(
    f: impl FnOnce(&[Real<F>]) -> Real<F>,
    x: &Array1<F>,
) -> (F, Array1<F>, Array2<F>) {
    let n = x.len();
    let (v, g, h) = api::hessian(f, &x.to_vec());
    (v, Array1::from_vec(g), Array2::from_shape_fn((n, n), |(i, j)| h[i][j]))
}
