use std::fmt::{self, Display};

use crate::engine;
use crate::error::{Error, Result};
use crate::float::Float;
use crate::matrix::{self, DenseMatrix, Matrix};
use crate::opcode::{BinaryOp, UnaryOp};
use crate::order::Order;
use crate::scalar::{ConstScalar, Differentiable, Scalar};
use crate::seed::SpaceId;
use crate::vector::{self, DenseVector, Vector};

/// Forward-mode differentiable scalar tracking up to second derivatives.
///
/// A `Real` holds its value together with the gradient and (row-major `N×N`)
/// Hessian with respect to `N` independent variables. Buffers are sized to the
/// tracked [`Order`] and only reallocated when `(N, order)` changes, so a
/// result reused across loop iterations stops allocating after the first.
///
/// ```
/// use numbat::{ConstScalar, Order, Real64, Scalar};
///
/// let x = Real64::variable(2.0, 0, 1, Order::Two);
/// let mut y = Real64::default();
/// y.mul(&x, &x);
/// assert_eq!(y.derivative(0), 4.0);
/// assert_eq!(y.hessian(0, 0), 2.0);
/// ```
///
/// Equality compares value, order and buffers. The [`SpaceId`] is not part of
/// it.
#[derive(Debug, Default)]
pub struct Real<F: Float> {
    pub(crate) value: F,
    pub(crate) order: Order,
    pub(crate) n: usize,
    pub(crate) derivative: Vec<F>,
    pub(crate) hessian: Vec<F>,
    pub(crate) space: SpaceId,
}

impl<F: Float> Real<F> {
    /// A constant with no derivative information.
    #[inline]
    pub fn new(value: F) -> Self {
        Real {
            value,
            ..Default::default()
        }
    }

    /// Alias of [`Real::new`].
    #[inline]
    pub fn constant(value: F) -> Self {
        Self::new(value)
    }

    /// The `i`-th of `n` independent variables, tracked up to `order`.
    ///
    /// The result is not bound to a seeded space; use
    /// [`variables`](crate::variables) when several inputs must be checked to
    /// share one.
    ///
    /// # Panics
    ///
    /// If `order` tracks a gradient and `i >= n`.
    pub fn variable(value: F, i: usize, n: usize, order: Order) -> Self {
        let mut x = Self::new(value);
        x.alloc(n, order);
        if order.has_gradient() {
            x.derivative[i] = F::one();
        }
        x
    }

    /// Grow to `n` variables at `order`, keeping every existing entry at its
    /// `(i, j)` position. Never shrinks.
    pub(crate) fn widen(&mut self, n: usize, order: Order) {
        let n = n.max(self.n);
        let order = order.max(self.order);
        if n == self.n && order == self.order {
            return;
        }
        let old_n = self.n;
        if order.has_gradient() {
            self.derivative.resize(n, F::zero());
        }
        if order.has_hessian() {
            if self.hessian.is_empty() {
                self.hessian.resize(n * n, F::zero());
            } else if n != old_n {
                let mut h = vec![F::zero(); n * n];
                for i in 0..old_n {
                    h[i * n..i * n + old_n].copy_from_slice(&self.hessian[i * old_n..(i + 1) * old_n]);
                }
                self.hessian = h;
            }
        }
        self.n = n;
        self.order = order;
    }

    /// Gradient as a dense vector of length `N` (zeros below order one).
    pub fn gradient(&self) -> DenseVector<F> {
        DenseVector::from_fn(self.n, |i| self.derivative(i))
    }

    /// Hessian as a dense `N×N` matrix (zeros below order two).
    pub fn hessian_matrix(&self) -> DenseMatrix<F> {
        DenseMatrix::from_fn(self.n, self.n, |i, j| self.hessian(i, j))
    }

    /// Write the gradient into `r`, which must have dimension `N`.
    pub fn copy_gradient<V>(&self, r: &mut V) -> Result<()>
    where
        V: Vector,
        V::Elem: Scalar<Float = F>,
    {
        if r.dim() != self.n {
            return Err(Error::mismatch("copy_gradient", (self.n, 1), (r.dim(), 1)));
        }
        for i in 0..self.n {
            vector::store(r, i, self.derivative(i));
        }
        Ok(())
    }

    /// Write the Hessian into `r`, which must be `N×N`.
    pub fn copy_hessian<M>(&self, r: &mut M) -> Result<()>
    where
        M: Matrix,
        M::Elem: Scalar<Float = F>,
    {
        let n = self.n;
        if r.dims() != (n, n) {
            return Err(Error::mismatch("copy_hessian", (n, n), r.dims()));
        }
        for i in 0..n {
            for j in 0..n {
                matrix::store(r, i, j, self.hessian(i, j));
            }
        }
        Ok(())
    }
}

impl<F: Float> Clone for Real<F> {
    fn clone(&self) -> Self {
        Real {
            value: self.value,
            order: self.order,
            n: self.n,
            derivative: self.derivative.clone(),
            hessian: self.hessian.clone(),
            space: self.space,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.value = source.value;
        self.order = source.order;
        self.n = source.n;
        self.derivative.clone_from(&source.derivative);
        self.hessian.clone_from(&source.hessian);
        self.space = source.space;
    }
}

impl<F: Float> PartialEq for Real<F> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && self.order == other.order
            && self.n == other.n
            && self.derivative == other.derivative
            && self.hessian == other.hessian
    }
}

impl<F: Float> Display for Real<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:e}", self.value)
    }
}

impl<F: Float> From<F> for Real<F> {
    #[inline]
    fn from(value: F) -> Self {
        Self::new(value)
    }
}

impl<F: Float> ConstScalar for Real<F> {
    type Float = F;

    #[inline]
    fn value(&self) -> F {
        self.value
    }

    #[inline]
    fn order(&self) -> Order {
        self.order
    }

    #[inline]
    fn num_variables(&self) -> usize {
        self.n
    }

    #[inline]
    fn derivatives(&self) -> &[F] {
        &self.derivative
    }

    #[inline]
    fn hessian_entries(&self) -> &[F] {
        &self.hessian
    }

    #[inline]
    fn space(&self) -> SpaceId {
        self.space
    }
}

impl<F: Float> Scalar for Real<F> {
    #[inline]
    fn from_value(value: F) -> Self {
        Self::new(value)
    }

    fn set<A: ConstScalar<Float = F>>(&mut self, a: &A) {
        self.alloc(a.num_variables(), a.order());
        self.value = a.value();
        if self.order.has_gradient() {
            self.derivative.copy_from_slice(a.derivatives());
        }
        if self.order.has_hessian() {
            self.hessian.copy_from_slice(a.hessian_entries());
        }
        self.space = a.space();
    }

    #[inline]
    fn set_value(&mut self, value: F) {
        self.value = value;
        self.reset_derivatives();
    }

    #[inline]
    fn reset(&mut self) {
        self.set_value(F::zero());
    }

    #[inline]
    fn unary<A: ConstScalar<Float = F>>(&mut self, op: UnaryOp, a: &A) {
        engine::monadic(self, op, a);
    }

    #[inline]
    fn unary_assign(&mut self, op: UnaryOp) {
        engine::monadic_in_place(self, op);
    }

    #[inline]
    fn binary<A, B>(&mut self, op: BinaryOp, a: &A, b: &B)
    where
        A: ConstScalar<Float = F>,
        B: ConstScalar<Float = F>,
    {
        engine::dyadic(self, op, a, b);
    }

    #[inline]
    fn binary_assign<B: ConstScalar<Float = F>>(&mut self, op: BinaryOp, b: &B) {
        engine::dyadic_in_place(self, op, b);
    }
}

impl<F: Float> Differentiable for Real<F> {
    fn alloc(&mut self, n: usize, order: Order) {
        if self.n == n && self.order == order {
            return;
        }
        self.n = n;
        self.order = order;
        // clear + resize keeps the existing capacity
        self.derivative.clear();
        self.hessian.clear();
        if order.has_gradient() {
            self.derivative.resize(n, F::zero());
        }
        if order.has_hessian() {
            self.hessian.resize(n * n, F::zero());
        }
    }

    /// Zeroed buffers belong to no space, so this also unbinds `self`.
    #[inline]
    fn reset_derivatives(&mut self) {
        self.derivative.fill(F::zero());
        self.hessian.fill(F::zero());
        self.space = SpaceId::UNBOUND;
    }

    fn set_derivative(&mut self, i: usize, v: F) {
        assert!(self.order.has_gradient(), "no gradient tracked at order {}", self.order);
        self.derivative[i] = v;
    }

    fn set_hessian(&mut self, i: usize, j: usize, v: F) {
        assert!(self.order.has_hessian(), "no Hessian tracked at order {}", self.order);
        let n = self.n;
        assert!(i < n && j < n, "hessian index ({i}, {j}) out of range for {n} variables");
        self.hessian[i * n + j] = v;
    }

    fn set_variable(&mut self, i: usize, n: usize, order: usize) -> Result<()> {
        let order = Order::try_from(order)?;
        self.alloc(n, order);
        self.reset_derivatives();
        if order.has_gradient() {
            self.derivative[i] = F::one();
        }
        Ok(())
    }

    #[inline]
    fn bind_space(&mut self, space: SpaceId) {
        self.space = space;
    }
}
