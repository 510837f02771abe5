//! Capability tiers for numeric elements.
//!
//! Generic kernels are written against these traits and work unchanged with
//! plain `f32`/`f64` and with the differentiable [`Real`](crate::Real):
//!
//! - [`ConstScalar`]: read access to the value and, for differentiable kinds,
//!   the derivative buffers. Non-differentiable kinds report [`Order::Zero`]
//!   and empty buffers, so a constant contributes zero to every gradient
//!   without any branching in the caller.
//! - [`Scalar`]: in-place mutation and arithmetic into `self`.
//! - [`Differentiable`]: buffer allocation and variable seeding.

use std::fmt::{Debug, Display};

use num_traits::{Float as _, One as _, ToPrimitive as _, Zero as _};

use crate::error::Result;
use crate::float::Float;
use crate::opcode::{self, BinaryOp, UnaryOp};
use crate::order::Order;
use crate::seed::SpaceId;

/// Read-only view of a numeric element.
pub trait ConstScalar {
    /// The underlying primitive float type.
    type Float: Float;

    /// Primal value.
    fn value(&self) -> Self::Float;

    /// Highest derivative degree tracked.
    fn order(&self) -> Order;

    /// Number of independent variables the derivative buffers are sized for.
    fn num_variables(&self) -> usize;

    /// Gradient buffer; empty below [`Order::One`].
    fn derivatives(&self) -> &[Self::Float];

    /// Row-major `N×N` Hessian buffer; empty below [`Order::Two`].
    fn hessian_entries(&self) -> &[Self::Float];

    /// Derivative space the buffers refer to.
    #[inline]
    fn space(&self) -> SpaceId {
        SpaceId::UNBOUND
    }

    /// `∂value/∂x_i`, or zero when no gradient is tracked.
    ///
    /// # Panics
    ///
    /// If a gradient is tracked and `i >= num_variables()`.
    #[inline]
    fn derivative(&self, i: usize) -> Self::Float {
        if self.order().has_gradient() {
            self.derivatives()[i]
        } else {
            Self::Float::zero()
        }
    }

    /// `∂²value/∂x_i∂x_j`, or zero when no Hessian is tracked.
    ///
    /// # Panics
    ///
    /// If a Hessian is tracked and either index is out of range.
    #[inline]
    fn hessian(&self, i: usize, j: usize) -> Self::Float {
        if self.order().has_hessian() {
            let n = self.num_variables();
            assert!(i < n && j < n, "hessian index ({i}, {j}) out of range for {n} variables");
            self.hessian_entries()[i * n + j]
        } else {
            Self::Float::zero()
        }
    }

    /// Natural logarithm of the value.
    #[inline]
    fn log_value(&self) -> Self::Float {
        self.value().ln()
    }

    /// Sign of the value: -1, 0 or 1.
    #[inline]
    fn sign(&self) -> i8 {
        let v = self.value();
        if v > Self::Float::zero() {
            1
        } else if v < Self::Float::zero() {
            -1
        } else {
            0
        }
    }

    /// Values differ by less than `epsilon`. Derivatives are not compared.
    #[inline]
    fn equals<B: ConstScalar<Float = Self::Float>>(&self, b: &B, epsilon: Self::Float) -> bool {
        num_traits::Float::abs(self.value() - b.value()) < epsilon
    }

    #[inline]
    fn greater<B: ConstScalar<Float = Self::Float>>(&self, b: &B) -> bool {
        self.value() > b.value()
    }

    #[inline]
    fn smaller<B: ConstScalar<Float = Self::Float>>(&self, b: &B) -> bool {
        self.value() < b.value()
    }
}

/// Mutable numeric element: assignment and arithmetic into `self`.
///
/// The four dispatch methods ([`unary`](Scalar::unary),
/// [`unary_assign`](Scalar::unary_assign), [`binary`](Scalar::binary),
/// [`binary_assign`](Scalar::binary_assign)) are the only arithmetic an
/// implementor provides; every named primitive and composition is built on
/// them. The `_assign` forms use `self` as the (left) operand.
pub trait Scalar: ConstScalar + Clone + Debug + Display {
    /// Construct a constant with the given value.
    fn from_value(value: Self::Float) -> Self;

    /// Copy value, order and derivatives of `a` into `self`.
    fn set<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A);

    /// Replace the value and zero all derivatives. Order and allocation are kept.
    fn set_value(&mut self, value: Self::Float);

    /// Zero the value and all derivatives. Order and allocation are kept.
    fn reset(&mut self);

    /// `self = op(a)`
    fn unary<A: ConstScalar<Float = Self::Float>>(&mut self, op: UnaryOp, a: &A);

    /// `self = op(self)`
    fn unary_assign(&mut self, op: UnaryOp);

    /// `self = op(a, b)`
    fn binary<A, B>(&mut self, op: BinaryOp, a: &A, b: &B)
    where
        A: ConstScalar<Float = Self::Float>,
        B: ConstScalar<Float = Self::Float>;

    /// `self = op(self, b)`
    fn binary_assign<B: ConstScalar<Float = Self::Float>>(&mut self, op: BinaryOp, b: &B);

    // ── Named primitives ──

    fn neg<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A) -> &mut Self {
        self.unary(UnaryOp::Neg, a);
        self
    }

    fn abs<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A) -> &mut Self {
        self.unary(UnaryOp::Abs, a);
        self
    }

    fn recip<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A) -> &mut Self {
        self.unary(UnaryOp::Recip, a);
        self
    }

    fn sqrt<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A) -> &mut Self {
        self.unary(UnaryOp::Sqrt, a);
        self
    }

    fn exp<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A) -> &mut Self {
        self.unary(UnaryOp::Exp, a);
        self
    }

    fn log<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A) -> &mut Self {
        self.unary(UnaryOp::Log, a);
        self
    }

    fn log1p<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A) -> &mut Self {
        self.unary(UnaryOp::Log1p, a);
        self
    }

    fn sin<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A) -> &mut Self {
        self.unary(UnaryOp::Sin, a);
        self
    }

    fn cos<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A) -> &mut Self {
        self.unary(UnaryOp::Cos, a);
        self
    }

    fn tan<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A) -> &mut Self {
        self.unary(UnaryOp::Tan, a);
        self
    }

    fn sinh<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A) -> &mut Self {
        self.unary(UnaryOp::Sinh, a);
        self
    }

    fn cosh<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A) -> &mut Self {
        self.unary(UnaryOp::Cosh, a);
        self
    }

    fn tanh<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A) -> &mut Self {
        self.unary(UnaryOp::Tanh, a);
        self
    }

    fn erf<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A) -> &mut Self {
        self.unary(UnaryOp::Erf, a);
        self
    }

    fn erfc<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A) -> &mut Self {
        self.unary(UnaryOp::Erfc, a);
        self
    }

    fn log_erfc<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A) -> &mut Self {
        self.unary(UnaryOp::LogErfc, a);
        self
    }

    fn gamma<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A) -> &mut Self {
        self.unary(UnaryOp::Gamma, a);
        self
    }

    /// `self = ln Γ(a)`, NaN where `Γ(a) < 0`.
    fn lgamma<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A) -> &mut Self {
        self.unary(UnaryOp::Lgamma, a);
        self
    }

    /// Multivariate log-gamma `ln Γ_k(a)`.
    fn mlgamma<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A, k: u32) -> &mut Self {
        self.unary(UnaryOp::Mlgamma(k), a);
        self
    }

    fn add<A, B>(&mut self, a: &A, b: &B) -> &mut Self
    where
        A: ConstScalar<Float = Self::Float>,
        B: ConstScalar<Float = Self::Float>,
    {
        self.binary(BinaryOp::Add, a, b);
        self
    }

    fn sub<A, B>(&mut self, a: &A, b: &B) -> &mut Self
    where
        A: ConstScalar<Float = Self::Float>,
        B: ConstScalar<Float = Self::Float>,
    {
        self.binary(BinaryOp::Sub, a, b);
        self
    }

    fn mul<A, B>(&mut self, a: &A, b: &B) -> &mut Self
    where
        A: ConstScalar<Float = Self::Float>,
        B: ConstScalar<Float = Self::Float>,
    {
        self.binary(BinaryOp::Mul, a, b);
        self
    }

    fn div<A, B>(&mut self, a: &A, b: &B) -> &mut Self
    where
        A: ConstScalar<Float = Self::Float>,
        B: ConstScalar<Float = Self::Float>,
    {
        self.binary(BinaryOp::Div, a, b);
        self
    }

    /// `self = a^k`. A constant exponent propagates through `a` alone.
    fn pow<A, K>(&mut self, a: &A, k: &K) -> &mut Self
    where
        A: ConstScalar<Float = Self::Float>,
        K: ConstScalar<Float = Self::Float>,
    {
        self.binary(BinaryOp::Pow, a, k);
        self
    }

    /// Copy the operand with the smaller value (the second one on ties).
    fn min<A, B>(&mut self, a: &A, b: &B) -> &mut Self
    where
        A: ConstScalar<Float = Self::Float>,
        B: ConstScalar<Float = Self::Float>,
    {
        if a.value() < b.value() {
            self.set(a);
        } else {
            self.set(b);
        }
        self
    }

    /// Copy the operand with the larger value (the second one on ties).
    fn max<A, B>(&mut self, a: &A, b: &B) -> &mut Self
    where
        A: ConstScalar<Float = Self::Float>,
        B: ConstScalar<Float = Self::Float>,
    {
        if a.value() > b.value() {
            self.set(a);
        } else {
            self.set(b);
        }
        self
    }

    // ── Log-space compositions ──
    //
    // These are built from the primitives above, so derivatives flow through
    // every intermediate step. `t` is caller-provided scratch.

    /// `self = log(exp(a) + exp(b))`.
    fn log_add<A, B>(&mut self, a: &A, b: &B, t: &mut Self) -> &mut Self
    where
        A: ConstScalar<Float = Self::Float>,
        B: ConstScalar<Float = Self::Float>,
    {
        // keep the larger operand outside the exponential
        if a.value() > b.value() {
            log_add_ordered(self, b, a, t);
        } else {
            log_add_ordered(self, a, b, t);
        }
        self
    }

    /// `self = log(exp(a) - exp(b))`.
    fn log_sub<A, B>(&mut self, a: &A, b: &B, t: &mut Self) -> &mut Self
    where
        A: ConstScalar<Float = Self::Float>,
        B: ConstScalar<Float = Self::Float>,
    {
        if b.value() == Self::Float::neg_infinity() {
            self.set(a);
            return self;
        }
        // log(1 - exp(b - a)) + a
        t.sub(b, a);
        t.unary_assign(UnaryOp::Exp);
        t.unary_assign(UnaryOp::Neg);
        t.unary_assign(UnaryOp::Log1p);
        self.add(&*t, a)
    }

    /// `self = log(1 + exp(a))`, switching formulas by range for stability.
    fn log1p_exp<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A) -> &mut Self {
        let v = a.value().to_f64().unwrap_or(f64::NAN);
        if v <= -37.0 {
            self.exp(a);
        } else if v <= 18.0 {
            self.exp(a);
            self.unary_assign(UnaryOp::Log1p);
        } else if v <= 33.3 {
            // a + exp(-a)
            self.neg(a);
            self.unary_assign(UnaryOp::Exp);
            self.binary_assign(BinaryOp::Add, a);
        } else {
            self.set(a);
        }
        self
    }

    /// `self = 1 / (1 + exp(-a))`.
    fn logistic<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A) -> &mut Self {
        self.neg(a);
        self.unary_assign(UnaryOp::Exp);
        self.binary_assign(BinaryOp::Add, &Self::Float::one());
        self.unary_assign(UnaryOp::Recip);
        self
    }

    /// Logistic function evaluated without overflow for large `|a|`.
    fn sigmoid<A: ConstScalar<Float = Self::Float>>(&mut self, a: &A, t: &mut Self) -> &mut Self {
        if a.value() >= Self::Float::zero() {
            self.logistic(a)
        } else {
            // exp(a) / (1 + exp(a))
            t.exp(a);
            self.set(&*t);
            t.binary_assign(BinaryOp::Add, &Self::Float::one());
            self.binary_assign(BinaryOp::Div, &*t);
            self
        }
    }
}

/// `c = log(exp(a) + exp(b))` for `a <= b`.
fn log_add_ordered<S, A, B>(c: &mut S, a: &A, b: &B, t: &mut S)
where
    S: Scalar,
    A: ConstScalar<Float = S::Float>,
    B: ConstScalar<Float = S::Float>,
{
    if a.value().is_infinite() {
        // a = -inf and b >= a gives b; a = +inf forces b = +inf
        c.set(b);
        return;
    }
    t.sub(a, b);
    t.unary_assign(UnaryOp::Exp);
    t.unary_assign(UnaryOp::Log1p);
    c.add(&*t, b);
}

/// Derivative-aware element: owns gradient/Hessian buffers and can be seeded.
pub trait Differentiable: Scalar {
    /// Size the buffers for `n` variables at `order`. A no-op when they
    /// already match; otherwise the buffers are zero-filled.
    fn alloc(&mut self, n: usize, order: Order);

    /// Zero the gradient and Hessian, keeping value, order and allocation.
    fn reset_derivatives(&mut self);

    /// # Panics
    ///
    /// If no gradient is tracked or `i` is out of range.
    fn set_derivative(&mut self, i: usize, v: Self::Float);

    /// # Panics
    ///
    /// If no Hessian is tracked or an index is out of range.
    fn set_hessian(&mut self, i: usize, j: usize, v: Self::Float);

    /// Make `self` the `i`-th of `n` independent variables at `order`:
    /// buffers sized `n`, zero-filled, with `∂self/∂x_i = 1`.
    ///
    /// Fails with [`Error::UnsupportedOrder`](crate::Error::UnsupportedOrder)
    /// when `order > 2`, leaving `self` untouched.
    fn set_variable(&mut self, i: usize, n: usize, order: usize) -> Result<()>;

    /// Attach the buffers to a seeded derivative space.
    fn bind_space(&mut self, space: SpaceId);
}

// ──────────────────────────────────────────────
//  Base floats: Order 0, no buffers
// ──────────────────────────────────────────────

macro_rules! impl_float_scalar {
    ($f:ty) => {
        impl ConstScalar for $f {
            type Float = $f;

            #[inline]
            fn value(&self) -> $f {
                *self
            }

            #[inline]
            fn order(&self) -> Order {
                Order::Zero
            }

            #[inline]
            fn num_variables(&self) -> usize {
                0
            }

            #[inline]
            fn derivatives(&self) -> &[$f] {
                &[]
            }

            #[inline]
            fn hessian_entries(&self) -> &[$f] {
                &[]
            }
        }

        impl Scalar for $f {
            #[inline]
            fn from_value(value: $f) -> Self {
                value
            }

            #[inline]
            fn set<A: ConstScalar<Float = $f>>(&mut self, a: &A) {
                *self = a.value();
            }

            #[inline]
            fn set_value(&mut self, value: $f) {
                *self = value;
            }

            #[inline]
            fn reset(&mut self) {
                *self = 0.0;
            }

            #[inline]
            fn unary<A: ConstScalar<Float = $f>>(&mut self, op: UnaryOp, a: &A) {
                *self = opcode::eval_unary(op, a.value());
            }

            #[inline]
            fn unary_assign(&mut self, op: UnaryOp) {
                *self = opcode::eval_unary(op, *self);
            }

            #[inline]
            fn binary<A, B>(&mut self, op: BinaryOp, a: &A, b: &B)
            where
                A: ConstScalar<Float = $f>,
                B: ConstScalar<Float = $f>,
            {
                *self = opcode::eval_binary(op, a.value(), b.value());
            }

            #[inline]
            fn binary_assign<B: ConstScalar<Float = $f>>(&mut self, op: BinaryOp, b: &B) {
                *self = opcode::eval_binary(op, *self, b.value());
            }
        }
    };
}

impl_float_scalar!(f32);
impl_float_scalar!(f64);
