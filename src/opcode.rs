//! Primitive operations and their derivative formulas.
//!
//! Each primitive is one variant of [`UnaryOp`] or [`BinaryOp`]. The
//! `eval_*` functions compute the primal value; the `*_partials` functions
//! compute the first partial derivatives and, only when the requested
//! [`Order`] is [`Order::Two`], the second partials. The propagation engine
//! never asks for partials at order zero.

use crate::float::Float;
use crate::order::Order;
use crate::special;

/// Unary primitives understood by the propagation engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Recip,
    Sqrt,

    // ── Exp / Log ──
    Exp,
    Log,
    Log1p,

    // ── Trig ──
    Sin,
    Cos,
    Tan,

    // ── Hyperbolic ──
    Sinh,
    Cosh,
    Tanh,

    // ── Special ──
    Erf,
    Erfc,
    /// `ln erfc x`, finite far into the right tail.
    LogErfc,
    Gamma,
    /// `ln Γ(x)`, NaN where `Γ(x) < 0`.
    Lgamma,
    /// Multivariate log-gamma of dimension `k`.
    Mlgamma(u32),

    // ── Misc ──
    /// Derivative is the sign of the operand, zero at the origin.
    Abs,
}

/// Binary primitives understood by the propagation engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    /// `a^b` with both base and exponent differentiable.
    Pow,
}

/// First and second partial derivatives of a primitive at one point.
///
/// For a unary primitive only `a` and `aa` are meaningful; the remaining
/// fields are zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Partials<T> {
    /// ∂h/∂a
    pub a: T,
    /// ∂h/∂b
    pub b: T,
    /// ∂²h/∂a²
    pub aa: T,
    /// ∂²h/∂a∂b
    pub ab: T,
    /// ∂²h/∂b²
    pub bb: T,
}

impl<T: Float> Partials<T> {
    #[inline]
    fn first(a: T, b: T) -> Self {
        Partials {
            a,
            b,
            aa: T::zero(),
            ab: T::zero(),
            bb: T::zero(),
        }
    }

    #[inline]
    fn unary(a: T, aa: T) -> Self {
        Partials {
            a,
            b: T::zero(),
            aa,
            ab: T::zero(),
            bb: T::zero(),
        }
    }
}

/// Evaluate a unary primitive.
#[inline]
pub fn eval_unary<T: Float>(op: UnaryOp, x: T) -> T {
    match op {
        UnaryOp::Neg => -x,
        UnaryOp::Recip => x.recip(),
        UnaryOp::Sqrt => x.sqrt(),
        UnaryOp::Exp => x.exp(),
        UnaryOp::Log => x.ln(),
        UnaryOp::Log1p => x.ln_1p(),
        UnaryOp::Sin => x.sin(),
        UnaryOp::Cos => x.cos(),
        UnaryOp::Tan => x.tan(),
        UnaryOp::Sinh => x.sinh(),
        UnaryOp::Cosh => x.cosh(),
        UnaryOp::Tanh => x.tanh(),
        UnaryOp::Erf => via_f64(x, libm::erf),
        UnaryOp::Erfc => via_f64(x, libm::erfc),
        UnaryOp::LogErfc => via_f64(x, special::log_erfc),
        UnaryOp::Gamma => via_f64(x, special::gamma),
        UnaryOp::Lgamma => via_f64(x, special::lgamma),
        UnaryOp::Mlgamma(k) => via_f64(x, |v| special::mlgamma(v, k)),
        UnaryOp::Abs => x.abs(),
    }
}

/// Evaluate a binary primitive.
#[inline]
pub fn eval_binary<T: Float>(op: BinaryOp, x: T, y: T) -> T {
    match op {
        BinaryOp::Add => x + y,
        BinaryOp::Sub => x - y,
        BinaryOp::Mul => x * y,
        BinaryOp::Div => x / y,
        BinaryOp::Pow => x.powf(y),
    }
}

/// Partials of a unary primitive at `x`, where `r = op(x)`.
///
/// Second partials are only evaluated when `order` is [`Order::Two`].
#[inline]
pub fn unary_partials<T: Float>(op: UnaryOp, order: Order, x: T, r: T) -> Partials<T> {
    let zero = T::zero();
    let one = T::one();
    let two = one + one;
    let second = order.has_hessian();
    let (d1, d2) = match op {
        UnaryOp::Neg => (-one, zero),
        UnaryOp::Recip => {
            // d/dx 1/x = -1/x², d²/dx² = 2/x³
            let d2 = if second { two * r * r * r } else { zero };
            (-r * r, d2)
        }
        UnaryOp::Sqrt => {
            let d1 = one / (two * r);
            let d2 = if second { -d1 / (two * x) } else { zero };
            (d1, d2)
        }
        UnaryOp::Exp => (r, r),
        UnaryOp::Log => {
            let inv = one / x;
            (inv, if second { -inv * inv } else { zero })
        }
        UnaryOp::Log1p => {
            let inv = one / (one + x);
            (inv, if second { -inv * inv } else { zero })
        }
        UnaryOp::Sin => (x.cos(), if second { -r } else { zero }),
        UnaryOp::Cos => (-x.sin(), if second { -r } else { zero }),
        UnaryOp::Tan => {
            let d1 = one + r * r;
            (d1, if second { two * r * d1 } else { zero })
        }
        UnaryOp::Sinh => (x.cosh(), if second { r } else { zero }),
        UnaryOp::Cosh => (x.sinh(), if second { r } else { zero }),
        UnaryOp::Tanh => {
            let d1 = one - r * r;
            (d1, if second { -two * r * d1 } else { zero })
        }
        UnaryOp::Erf | UnaryOp::Erfc => {
            // d/dx erf(x) = 2/√π e^{-x²}
            let g = T::FRAC_2_SQRT_PI() * (-x * x).exp();
            let d2 = if second { -two * x * g } else { zero };
            if op == UnaryOp::Erf {
                (g, d2)
            } else {
                (-g, -d2)
            }
        }
        UnaryOp::LogErfc => {
            // -2e^{-x²}/(√π erfc x), evaluated through r = ln erfc x
            let d1 = -T::FRAC_2_SQRT_PI() * (-x * x - r).exp();
            (d1, if second { -d1 * (two * x + d1) } else { zero })
        }
        UnaryOp::Gamma => {
            let psi = via_f64(x, special::digamma);
            let d2 = if second {
                r * (psi * psi + via_f64(x, special::trigamma))
            } else {
                zero
            };
            (r * psi, d2)
        }
        UnaryOp::Lgamma => {
            let d2 = if second { via_f64(x, special::trigamma) } else { zero };
            (via_f64(x, special::digamma), d2)
        }
        UnaryOp::Mlgamma(k) => {
            let sum = |f: fn(f64) -> f64| {
                via_f64(x, |v| special::half_steps(k).map(|j| f(v + j)).sum::<f64>())
            };
            let d2 = if second { sum(special::trigamma) } else { zero };
            (sum(special::digamma), d2)
        }
        UnaryOp::Abs => (sign(x), zero),
    };
    Partials::unary(d1, d2)
}

/// Partials of a binary primitive at `(x, y)`, where `r = op(x, y)`.
///
/// Second partials are only evaluated when `order` is [`Order::Two`].
#[inline]
pub fn binary_partials<T: Float>(op: BinaryOp, order: Order, x: T, y: T, r: T) -> Partials<T> {
    let one = T::one();
    let second = order.has_hessian();
    match op {
        BinaryOp::Add => Partials::first(one, one),
        BinaryOp::Sub => Partials::first(one, -one),
        BinaryOp::Mul => {
            let mut p = Partials::first(y, x);
            if second {
                p.ab = one;
            }
            p
        }
        BinaryOp::Div => {
            // quotient rule: h_aa = 0, h_ab = -1/y², h_bb = 2x/y³
            let inv = one / y;
            let mut p = Partials::first(inv, -x * inv * inv);
            if second {
                p.ab = -inv * inv;
                p.bb = (one + one) * x * inv * inv * inv;
            }
            p
        }
        BinaryOp::Pow => {
            let ln_x = x.ln();
            let x_pow_y1 = x.powf(y - one);
            let mut p = Partials::first(y * x_pow_y1, r * ln_x);
            if second {
                p.aa = y * (y - one) * x.powf(y - one - one);
                p.ab = x_pow_y1 * (one + y * ln_x);
                p.bb = r * ln_x * ln_x;
            }
            p
        }
    }
}

/// Sign of `x` as -1, 0 or 1 (zero maps to zero, unlike `signum`).
#[inline]
pub(crate) fn sign<T: Float>(x: T) -> T {
    if x > T::zero() {
        T::one()
    } else if x < T::zero() {
        -T::one()
    } else {
        T::zero()
    }
}

#[inline]
fn via_f64<T: Float>(x: T, f: impl FnOnce(f64) -> f64) -> T {
    x.to_f64()
        .and_then(|v| T::from_f64(f(v)))
        .unwrap_or_else(T::nan)
}
