use crate::float::Float;
use crate::order::Order;
use crate::real::Real;
use crate::scalar::{ConstScalar, Differentiable};
use crate::seed::SpaceId;

/// `x` as the independent variables of one derivative space at `order`.
fn seeded<F: Float>(x: &[F], order: Order) -> Vec<Real<F>> {
    let n = x.len();
    let space = SpaceId::fresh();
    x.iter()
        .enumerate()
        .map(|(i, &xi)| {
            let mut v = Real::variable(xi, i, n, order);
            v.bind_space(space);
            v
        })
        .collect()
}

/// Value and gradient of a scalar function `f : R^n → R`.
///
/// `f` is evaluated once.
///
/// ```
/// use numbat::{Real64, Scalar};
///
/// let (v, g) = numbat::gradient(|x: &[Real64]| {
///     let mut r = Real64::default();
///     r.mul(&x[0], &x[1]);
///     r
/// }, &[3.0, 4.0]);
/// assert_eq!(v, 12.0);
/// assert_eq!(g, vec![4.0, 3.0]);
/// ```
pub fn gradient<F: Float>(f: impl FnOnce(&[Real<F>]) -> Real<F>, x: &[F]) -> (F, Vec<F>) {
    let inputs = seeded(x, Order::One);
    let y = f(&inputs);
    let g = (0..x.len()).map(|i| read_gradient(&y, i)).collect();
    (y.value(), g)
}

/// Values and Jacobian of `f : R^n → R^m`.
///
/// Returns `(f(x), J)` where `J[i][j] = ∂f_i/∂x_j`. All columns come out of a
/// single evaluation of `f`.
pub fn jacobian<F: Float>(
    f: impl FnOnce(&[Real<F>]) -> Vec<Real<F>>,
    x: &[F],
) -> (Vec<F>, Vec<Vec<F>>) {
    let n = x.len();
    let inputs = seeded(x, Order::One);
    let outputs = f(&inputs);
    let values = outputs.iter().map(ConstScalar::value).collect();
    let jac = outputs
        .iter()
        .map(|y| (0..n).map(|j| read_gradient(y, j)).collect())
        .collect();
    (values, jac)
}

/// Value, gradient and Hessian of a scalar function `f : R^n → R`.
///
/// `f` is evaluated once, on inputs seeded at order two.
pub fn hessian<F: Float>(
    f: impl FnOnce(&[Real<F>]) -> Real<F>,
    x: &[F],
) -> (F, Vec<F>, Vec<Vec<F>>) {
    let n = x.len();
    let inputs = seeded(x, Order::Two);
    let y = f(&inputs);
    let g = (0..n).map(|i| read_gradient(&y, i)).collect();
    let h = (0..n)
        .map(|i| (0..n).map(|j| read_hessian(&y, i, j)).collect())
        .collect();
    (y.value(), g, h)
}

// A result that never touched an input is a constant with no buffers.
fn read_gradient<F: Float>(y: &Real<F>, i: usize) -> F {
    y.derivatives().get(i).copied().unwrap_or_else(F::zero)
}

fn read_hessian<F: Float>(y: &Real<F>, i: usize, j: usize) -> F {
    let k = y.num_variables();
    if i < k && j < k {
        y.hessian_entries()
            .get(i * k + j)
            .copied()
            .unwrap_or_else(F::zero)
    } else {
        F::zero()
    }
}
