//! Log-space arithmetic on plain floats.
//!
//! Differentiable versions live on [`Scalar`](crate::Scalar) as
//! [`log_add`](crate::Scalar::log_add) and [`log_sub`](crate::Scalar::log_sub).

use crate::float::Float;

/// `ln(eᵃ + eᵇ)` without overflow. `log_add(-∞, b) == b`.
pub fn log_add<F: Float>(a: F, b: F) -> F {
    let (a, b) = if a > b { (b, a) } else { (a, b) };
    if a == F::neg_infinity() {
        return b;
    }
    b + (a - b).exp().ln_1p()
}

/// `ln(eᵃ - eᵇ)` for `a >= b`. `log_sub(a, -∞) == a`.
pub fn log_sub<F: Float>(a: F, b: F) -> F {
    if b == F::neg_infinity() {
        return a;
    }
    a + (-(b - a).exp()).ln_1p()
}
