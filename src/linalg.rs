//! Linear-algebra kernels written once against the container and scalar
//! capability traits.
//!
//! Every kernel works unchanged for plain floats and for [`Real`](crate::Real)
//! elements, over dense and sparse containers. Shapes are checked before the
//! result is touched; a mismatch returns
//! [`Error::DimensionMismatch`](crate::Error::DimensionMismatch) and leaves the
//! result as it was.
//!
//! Absent sparse entries take part as exact zeros. A sparse result only gains
//! entries where an operand is present, and entries it already holds are
//! overwritten.

use std::cmp::Ordering;
use std::iter::Peekable;

use log::debug;

use crate::error::{Error, Result};
use crate::float::Float;
use crate::matrix::{self, ConstMatrix, Matrix};
use crate::opcode::{BinaryOp, UnaryOp};
use crate::scalar::{ConstScalar, Differentiable, Scalar};
use crate::vector::{ConstVector, DenseVector, Vector};

// ──────────────────────────────────────────────
//  Support iteration
// ──────────────────────────────────────────────

/// Ascending union of two ascending key streams.
struct Union<K, I: Iterator<Item = K>, J: Iterator<Item = K>> {
    a: Peekable<I>,
    b: Peekable<J>,
}

fn union<K, I, J>(a: I, b: J) -> Union<K, I, J>
where
    K: Ord + Copy,
    I: Iterator<Item = K>,
    J: Iterator<Item = K>,
{
    Union {
        a: a.peekable(),
        b: b.peekable(),
    }
}

impl<K, I, J> Iterator for Union<K, I, J>
where
    K: Ord + Copy,
    I: Iterator<Item = K>,
    J: Iterator<Item = K>,
{
    type Item = K;

    fn next(&mut self) -> Option<K> {
        match (self.a.peek().copied(), self.b.peek().copied()) {
            (Some(x), Some(y)) => match x.cmp(&y) {
                Ordering::Less => self.a.next(),
                Ordering::Greater => self.b.next(),
                Ordering::Equal => {
                    self.b.next();
                    self.a.next()
                }
            },
            (Some(_), None) => self.a.next(),
            (None, _) => self.b.next(),
        }
    }
}

fn vector_keys<V: ConstVector>(v: &V) -> impl Iterator<Item = usize> + '_ {
    v.iter().map(|(i, _)| i)
}

fn matrix_keys<M: ConstMatrix>(m: &M) -> impl Iterator<Item = (usize, usize)> + '_ {
    m.iter().map(|(ij, _)| ij)
}

fn check_vector(op: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::mismatch(op, (expected, 1), (found, 1)))
    }
}

fn check_matrix(op: &'static str, expected: (usize, usize), found: (usize, usize)) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::mismatch(op, expected, found))
    }
}

// ──────────────────────────────────────────────
//  Element-wise
// ──────────────────────────────────────────────

fn zip_vectors<F, R, A, B>(name: &'static str, op: BinaryOp, r: &mut R, a: &A, b: &B) -> Result<()>
where
    F: Float,
    R: Vector,
    R::Elem: Scalar<Float = F>,
    A: ConstVector,
    A::Elem: ConstScalar<Float = F>,
    B: ConstVector,
    B::Elem: ConstScalar<Float = F>,
{
    let n = r.dim();
    check_vector(name, n, a.dim())?;
    check_vector(name, n, b.dim())?;
    let zero = F::zero();
    let support: Vec<usize> =
        union(union(vector_keys(r), vector_keys(a)), vector_keys(b)).collect();
    for i in support {
        let e = r.at_mut(i);
        match (a.get(i), b.get(i)) {
            (Some(x), Some(y)) => e.binary(op, x, y),
            (Some(x), None) => e.binary(op, x, &zero),
            (None, Some(y)) => e.binary(op, &zero, y),
            (None, None) => e.binary(op, &zero, &zero),
        }
    }
    Ok(())
}

fn map_vector<F, R, A, S>(name: &'static str, op: BinaryOp, r: &mut R, a: &A, s: &S) -> Result<()>
where
    F: Float,
    R: Vector,
    R::Elem: Scalar<Float = F>,
    A: ConstVector,
    A::Elem: ConstScalar<Float = F>,
    S: ConstScalar<Float = F>,
{
    check_vector(name, r.dim(), a.dim())?;
    let zero = F::zero();
    let support: Vec<usize> = union(vector_keys(r), vector_keys(a)).collect();
    for i in support {
        let e = r.at_mut(i);
        match a.get(i) {
            Some(x) => e.binary(op, x, s),
            None => e.binary(op, &zero, s),
        }
    }
    Ok(())
}

fn zip_matrices<F, R, A, B>(name: &'static str, op: BinaryOp, r: &mut R, a: &A, b: &B) -> Result<()>
where
    F: Float,
    R: Matrix,
    R::Elem: Scalar<Float = F>,
    A: ConstMatrix,
    A::Elem: ConstScalar<Float = F>,
    B: ConstMatrix,
    B::Elem: ConstScalar<Float = F>,
{
    let dims = r.dims();
    check_matrix(name, dims, a.dims())?;
    check_matrix(name, dims, b.dims())?;
    let zero = F::zero();
    let support: Vec<(usize, usize)> =
        union(union(matrix_keys(r), matrix_keys(a)), matrix_keys(b)).collect();
    for (i, j) in support {
        let e = r.at_mut(i, j);
        match (a.get(i, j), b.get(i, j)) {
            (Some(x), Some(y)) => e.binary(op, x, y),
            (Some(x), None) => e.binary(op, x, &zero),
            (None, Some(y)) => e.binary(op, &zero, y),
            (None, None) => e.binary(op, &zero, &zero),
        }
    }
    Ok(())
}

fn map_matrix<F, R, A, S>(name: &'static str, op: BinaryOp, r: &mut R, a: &A, s: &S) -> Result<()>
where
    F: Float,
    R: Matrix,
    R::Elem: Scalar<Float = F>,
    A: ConstMatrix,
    A::Elem: ConstScalar<Float = F>,
    S: ConstScalar<Float = F>,
{
    check_matrix(name, r.dims(), a.dims())?;
    let zero = F::zero();
    let support: Vec<(usize, usize)> = union(matrix_keys(r), matrix_keys(a)).collect();
    for (i, j) in support {
        let e = r.at_mut(i, j);
        match a.get(i, j) {
            Some(x) => e.binary(op, x, s),
            None => e.binary(op, &zero, s),
        }
    }
    Ok(())
}

macro_rules! elementwise {
    ($( $(#[$doc:meta])* $vv:ident, $vs:ident, $mm:ident, $ms:ident => $op:ident; )*) => {
        $(
            $(#[$doc])*
            pub fn $vv<F, R, A, B>(r: &mut R, a: &A, b: &B) -> Result<()>
            where
                F: Float,
                R: Vector,
                R::Elem: Scalar<Float = F>,
                A: ConstVector,
                A::Elem: ConstScalar<Float = F>,
                B: ConstVector,
                B::Elem: ConstScalar<Float = F>,
            {
                zip_vectors(stringify!($vv), BinaryOp::$op, r, a, b)
            }

            $(#[$doc])*
            pub fn $vs<F, R, A, S>(r: &mut R, a: &A, s: &S) -> Result<()>
            where
                F: Float,
                R: Vector,
                R::Elem: Scalar<Float = F>,
                A: ConstVector,
                A::Elem: ConstScalar<Float = F>,
                S: ConstScalar<Float = F>,
            {
                map_vector(stringify!($vs), BinaryOp::$op, r, a, s)
            }

            $(#[$doc])*
            pub fn $mm<F, R, A, B>(r: &mut R, a: &A, b: &B) -> Result<()>
            where
                F: Float,
                R: Matrix,
                R::Elem: Scalar<Float = F>,
                A: ConstMatrix,
                A::Elem: ConstScalar<Float = F>,
                B: ConstMatrix,
                B::Elem: ConstScalar<Float = F>,
            {
                zip_matrices(stringify!($mm), BinaryOp::$op, r, a, b)
            }

            $(#[$doc])*
            pub fn $ms<F, R, A, S>(r: &mut R, a: &A, s: &S) -> Result<()>
            where
                F: Float,
                R: Matrix,
                R::Elem: Scalar<Float = F>,
                A: ConstMatrix,
                A::Elem: ConstScalar<Float = F>,
                S: ConstScalar<Float = F>,
            {
                map_matrix(stringify!($ms), BinaryOp::$op, r, a, s)
            }
        )*
    };
}

elementwise! {
    /// Element-wise sum into `r`.
    vadd, vadd_scalar, madd, madd_scalar => Add;
    /// Element-wise difference into `r`.
    vsub, vsub_scalar, msub, msub_scalar => Sub;
    /// Element-wise product into `r`.
    vmul, vmul_scalar, mmul, mmul_scalar => Mul;
    /// Element-wise quotient into `r`.
    vdiv, vdiv_scalar, mdiv, mdiv_scalar => Div;
}

// ──────────────────────────────────────────────
//  Products
// ──────────────────────────────────────────────

/// Add `x·y` into `acc`. The first term of a sum is written directly, later
/// ones go through `t`.
#[inline]
fn accumulate<S, X, Y>(acc: &mut S, t: &mut S, first: &mut bool, x: &X, y: &Y)
where
    S: Scalar,
    X: ConstScalar<Float = S::Float>,
    Y: ConstScalar<Float = S::Float>,
{
    if *first {
        acc.mul(x, y);
        *first = false;
    } else {
        t.mul(x, y);
        acc.binary_assign(BinaryOp::Add, &*t);
    }
}

/// Matrix product `r = a·b`.
///
/// Uses the scratch element of `r`, so a dense result reused across calls
/// keeps its temporary buffers.
pub fn mdotm<F, R, A, B>(r: &mut R, a: &A, b: &B) -> Result<()>
where
    F: Float,
    R: Matrix,
    R::Elem: Scalar<Float = F>,
    A: ConstMatrix,
    A::Elem: ConstScalar<Float = F>,
    B: ConstMatrix,
    B::Elem: ConstScalar<Float = F>,
{
    let (n, k) = a.dims();
    let (k2, m) = b.dims();
    if k != k2 {
        return Err(Error::mismatch("mdotm", (k, m), (k2, m)));
    }
    check_matrix("mdotm", (n, m), r.dims())?;
    let zero = F::zero();
    let mut t = r.take_scratch();
    for i in 0..n {
        for j in 0..m {
            let mut first = true;
            for l in 0..k {
                if let (Some(x), Some(y)) = (a.get(i, l), b.get(l, j)) {
                    accumulate(r.at_mut(i, j), &mut t, &mut first, x, y);
                }
            }
            if first {
                if let Some(e) = r.get_mut(i, j) {
                    e.set(&zero);
                }
            }
        }
    }
    r.restore_scratch(t);
    Ok(())
}

/// Matrix-vector product `r = a·b`.
pub fn mdotv<F, R, A, B>(r: &mut R, a: &A, b: &B) -> Result<()>
where
    F: Float,
    R: Vector,
    R::Elem: Scalar<Float = F>,
    A: ConstMatrix,
    A::Elem: ConstScalar<Float = F>,
    B: ConstVector,
    B::Elem: ConstScalar<Float = F>,
{
    let (n, m) = a.dims();
    check_vector("mdotv", m, b.dim())?;
    check_vector("mdotv", n, r.dim())?;
    let zero = F::zero();
    let mut t = R::Elem::from_value(zero);
    for i in 0..n {
        let mut first = true;
        for j in 0..m {
            if let (Some(x), Some(y)) = (a.get(i, j), b.get(j)) {
                accumulate(r.at_mut(i), &mut t, &mut first, x, y);
            }
        }
        if first {
            if let Some(e) = r.get_mut(i) {
                e.set(&zero);
            }
        }
    }
    Ok(())
}

/// Vector-matrix product `r = a·b`.
pub fn vdotm<F, R, A, B>(r: &mut R, a: &A, b: &B) -> Result<()>
where
    F: Float,
    R: Vector,
    R::Elem: Scalar<Float = F>,
    A: ConstVector,
    A::Elem: ConstScalar<Float = F>,
    B: ConstMatrix,
    B::Elem: ConstScalar<Float = F>,
{
    let (n, m) = b.dims();
    check_vector("vdotm", n, a.dim())?;
    check_vector("vdotm", m, r.dim())?;
    let zero = F::zero();
    let mut t = R::Elem::from_value(zero);
    for j in 0..m {
        let mut first = true;
        for i in 0..n {
            if let (Some(x), Some(y)) = (a.get(i), b.get(i, j)) {
                accumulate(r.at_mut(j), &mut t, &mut first, x, y);
            }
        }
        if first {
            if let Some(e) = r.get_mut(j) {
                e.set(&zero);
            }
        }
    }
    Ok(())
}

/// Outer product `r[i][j] = a[i]·b[j]`.
pub fn outer<F, R, A, B>(r: &mut R, a: &A, b: &B) -> Result<()>
where
    F: Float,
    R: Matrix,
    R::Elem: Scalar<Float = F>,
    A: ConstVector,
    A::Elem: ConstScalar<Float = F>,
    B: ConstVector,
    B::Elem: ConstScalar<Float = F>,
{
    let dims = (a.dim(), b.dim());
    check_matrix("outer", dims, r.dims())?;
    let zero = F::zero();
    for i in 0..dims.0 {
        for j in 0..dims.1 {
            match (a.get(i), b.get(j)) {
                (Some(x), Some(y)) => {
                    r.at_mut(i, j).mul(x, y);
                }
                _ => {
                    if let Some(e) = r.get_mut(i, j) {
                        e.set(&zero);
                    }
                }
            }
        }
    }
    Ok(())
}

// ──────────────────────────────────────────────
//  Reductions
// ──────────────────────────────────────────────

/// Dot product `r = a·b`.
pub fn vdot<F, S, A, B>(r: &mut S, a: &A, b: &B) -> Result<()>
where
    F: Float,
    S: Scalar<Float = F>,
    A: ConstVector,
    A::Elem: ConstScalar<Float = F>,
    B: ConstVector,
    B::Elem: ConstScalar<Float = F>,
{
    check_vector("vdot", a.dim(), b.dim())?;
    let mut t = S::from_value(F::zero());
    let mut first = true;
    for (i, x) in a.iter() {
        if let Some(y) = b.get(i) {
            accumulate(r, &mut t, &mut first, x, y);
        }
    }
    if first {
        r.set(&F::zero());
    }
    Ok(())
}

/// Euclidean norm `r = ‖a‖₂`.
pub fn vnorm<F, S, A>(r: &mut S, a: &A)
where
    F: Float,
    S: Scalar<Float = F>,
    A: ConstVector,
    A::Elem: ConstScalar<Float = F>,
{
    let mut t = S::from_value(F::zero());
    let mut first = true;
    for (_, x) in a.iter() {
        accumulate(r, &mut t, &mut first, x, x);
    }
    if first {
        r.set(&F::zero());
    }
    r.unary_assign(UnaryOp::Sqrt);
}

/// Arithmetic mean `r = Σ a[i] / dim(a)`.
pub fn vmean<F, S, A>(r: &mut S, a: &A)
where
    F: Float,
    S: Scalar<Float = F>,
    A: ConstVector,
    A::Elem: ConstScalar<Float = F>,
{
    r.set(&F::zero());
    for (_, x) in a.iter() {
        r.binary_assign(BinaryOp::Add, x);
    }
    let n = F::from_usize(a.dim()).unwrap_or_else(F::nan);
    r.binary_assign(BinaryOp::Div, &n);
}

/// Trace `r = Σ a[i][i]` of a square matrix.
pub fn mtrace<F, S, A>(r: &mut S, a: &A) -> Result<()>
where
    F: Float,
    S: Scalar<Float = F>,
    A: ConstMatrix,
    A::Elem: ConstScalar<Float = F>,
{
    let (rows, cols) = a.dims();
    if rows != cols {
        return Err(Error::NotSquare { rows, cols });
    }
    r.set(&F::zero());
    for i in 0..rows {
        if let Some(x) = a.get(i, i) {
            r.binary_assign(BinaryOp::Add, x);
        }
    }
    Ok(())
}

/// Frobenius norm `r = sqrt(Σ a[i][j]²)`.
pub fn mnorm<F, S, A>(r: &mut S, a: &A)
where
    F: Float,
    S: Scalar<Float = F>,
    A: ConstMatrix,
    A::Elem: ConstScalar<Float = F>,
{
    let mut t = S::from_value(F::zero());
    let mut first = true;
    for (_, x) in a.iter() {
        accumulate(r, &mut t, &mut first, x, x);
    }
    if first {
        r.set(&F::zero());
    }
    r.unary_assign(UnaryOp::Sqrt);
}

/// Differentiable maximum `r = Σ x[i]·e^{αx[i]} / Σ e^{αx[i]}`.
///
/// Tends to `max(x)` as `α` grows. Every index takes part, absent sparse
/// entries as zeros.
pub fn smooth_max<F, S, X, Al>(r: &mut S, x: &X, alpha: &Al)
where
    F: Float,
    S: Scalar<Float = F>,
    X: ConstVector,
    X::Elem: ConstScalar<Float = F>,
    Al: ConstScalar<Float = F>,
{
    let zero = F::zero();
    let mut weight = S::from_value(zero);
    let mut total = S::from_value(zero);
    r.set(&zero);
    for i in 0..x.dim() {
        match x.get(i) {
            Some(xi) => smooth_max_term(r, &mut total, &mut weight, xi, alpha),
            None => smooth_max_term(r, &mut total, &mut weight, &zero, alpha),
        }
    }
    r.binary_assign(BinaryOp::Div, &total);
}

fn smooth_max_term<S, X, Al>(r: &mut S, total: &mut S, w: &mut S, xi: &X, alpha: &Al)
where
    S: Scalar,
    X: ConstScalar<Float = S::Float>,
    Al: ConstScalar<Float = S::Float>,
{
    w.mul(alpha, xi);
    w.unary_assign(UnaryOp::Exp);
    total.binary_assign(BinaryOp::Add, &*w);
    w.binary_assign(BinaryOp::Mul, xi);
    r.binary_assign(BinaryOp::Add, &*w);
}

/// [`smooth_max`] evaluated in log space, for inputs where `e^{αx}`
/// overflows. Requires `x[i] >= 0`.
pub fn log_smooth_max<F, S, X, Al>(r: &mut S, x: &X, alpha: &Al)
where
    F: Float,
    S: Scalar<Float = F>,
    X: ConstVector,
    X::Elem: ConstScalar<Float = F>,
    Al: ConstScalar<Float = F>,
{
    let zero = F::zero();
    let mut state = LogSmoothMax {
        num: S::from_value(F::neg_infinity()),
        den: S::from_value(F::neg_infinity()),
        w: S::from_value(zero),
        l: S::from_value(zero),
        prev: S::from_value(zero),
        t: S::from_value(zero),
    };
    for i in 0..x.dim() {
        match x.get(i) {
            Some(xi) => state.push(xi, alpha),
            None => state.push(&zero, alpha),
        }
    }
    r.sub(&state.num, &state.den);
    r.unary_assign(UnaryOp::Exp);
}

/// Running log-sums of [`log_smooth_max`].
struct LogSmoothMax<S> {
    num: S,
    den: S,
    w: S,
    l: S,
    prev: S,
    t: S,
}

impl<S: Scalar> LogSmoothMax<S> {
    fn push<X, Al>(&mut self, xi: &X, alpha: &Al)
    where
        X: ConstScalar<Float = S::Float>,
        Al: ConstScalar<Float = S::Float>,
    {
        // den = log Σ e^{αx}, num = log Σ x·e^{αx}
        self.w.mul(xi, alpha);
        self.prev.set(&self.den);
        self.den.log_add(&self.prev, &self.w, &mut self.t);
        self.l.log(xi);
        self.w.binary_assign(BinaryOp::Add, &self.l);
        self.prev.set(&self.num);
        self.num.log_add(&self.prev, &self.w, &mut self.t);
    }
}

// ──────────────────────────────────────────────
//  Jacobian / Hessian
// ──────────────────────────────────────────────

/// Evaluate `f` once on constants copied from `x`, seeded at `order`.
pub(crate) fn eval_seeded<F, X, S, Y, Fun>(f: Fun, x: &X, order: usize) -> Result<Y>
where
    F: Float,
    X: ConstVector,
    X::Elem: ConstScalar<Float = F>,
    S: Differentiable<Float = F>,
    Fun: FnOnce(&DenseVector<S>) -> Y,
{
    let mut xs: DenseVector<S> = DenseVector::from_fn(x.dim(), |i| x.value_at(i));
    xs.variables(order)?;
    Ok(f(&xs))
}

/// Row `i` of `r` receives the gradient of `y[i]`. Shapes are the caller's
/// responsibility.
pub(crate) fn write_jacobian<F, R, Y>(r: &mut R, y: &Y)
where
    F: Float,
    R: Matrix,
    R::Elem: Scalar<Float = F>,
    Y: ConstVector,
    Y::Elem: ConstScalar<Float = F>,
{
    let (m, n) = r.dims();
    debug!("assembling {m}x{n} jacobian");
    for i in 0..m {
        let d = y.get(i).map_or(&[][..], ConstScalar::derivatives);
        for j in 0..n {
            let v = d.get(j).copied().unwrap_or_else(F::zero);
            matrix::store(r, i, j, v);
        }
    }
}

pub(crate) fn write_hessian<F, R, Y>(r: &mut R, y: &Y, n: usize)
where
    F: Float,
    R: Matrix,
    R::Elem: Scalar<Float = F>,
    Y: ConstScalar<Float = F>,
{
    debug!("assembling {n}x{n} hessian");
    let h = y.hessian_entries();
    let k = y.num_variables();
    for i in 0..n {
        for j in 0..n {
            let v = if i < k && j < k {
                h.get(i * k + j).copied().unwrap_or_else(F::zero)
            } else {
                F::zero()
            };
            matrix::store(r, i, j, v);
        }
    }
}

/// Jacobian of `f: ℝⁿ → ℝᵐ` at `x` into the `m×n` matrix `r`.
///
/// `f` receives a copy of `x` seeded at order one and is evaluated exactly
/// once. `r` must already have the right shape; see
/// [`DenseMatrix::jacobian`](crate::DenseMatrix::jacobian) for a resizing form.
pub fn jacobian<F, R, X, S, Y, Fun>(r: &mut R, f: Fun, x: &X) -> Result<()>
where
    F: Float,
    R: Matrix,
    R::Elem: Scalar<Float = F>,
    X: ConstVector,
    X::Elem: ConstScalar<Float = F>,
    S: Differentiable<Float = F>,
    Y: ConstVector,
    Y::Elem: ConstScalar<Float = F>,
    Fun: FnOnce(&DenseVector<S>) -> Y,
{
    let y = eval_seeded(f, x, 1)?;
    check_matrix("jacobian", (y.dim(), x.dim()), r.dims())?;
    write_jacobian(r, &y);
    Ok(())
}

/// Hessian of the scalar function `f` at `x` into the `n×n` matrix `r`.
///
/// `f` receives a copy of `x` seeded at order two and is evaluated exactly
/// once.
pub fn hessian<F, R, X, S, Y, Fun>(r: &mut R, f: Fun, x: &X) -> Result<()>
where
    F: Float,
    R: Matrix,
    R::Elem: Scalar<Float = F>,
    X: ConstVector,
    X::Elem: ConstScalar<Float = F>,
    S: Differentiable<Float = F>,
    Y: ConstScalar<Float = F>,
    Fun: FnOnce(&DenseVector<S>) -> Y,
{
    let n = x.dim();
    check_matrix("hessian", (n, n), r.dims())?;
    let y = eval_seeded(f, x, 2)?;
    write_hessian(r, &y, n);
    Ok(())
}
