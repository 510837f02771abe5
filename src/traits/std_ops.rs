use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::float::Float;
use crate::opcode::{BinaryOp, UnaryOp};
use crate::real::Real;
use crate::scalar::Scalar;

// ──────────────────────────────────────────────
//  Real<F> operators
// ──────────────────────────────────────────────
//
// Owned left operands are updated in place and returned, so chains like
// `a * &b + &c` only allocate for the first borrowed-borrowed step.

macro_rules! impl_real_binop {
    ($Op:ident, $op:ident, $OpAssign:ident, $op_assign:ident, $code:expr) => {
        impl<F: Float> $Op<&Real<F>> for Real<F> {
            type Output = Real<F>;
            #[inline]
            fn $op(mut self, rhs: &Real<F>) -> Real<F> {
                self.binary_assign($code, rhs);
                self
            }
        }

        impl<F: Float> $Op for Real<F> {
            type Output = Real<F>;
            #[inline]
            fn $op(mut self, rhs: Real<F>) -> Real<F> {
                self.binary_assign($code, &rhs);
                self
            }
        }

        impl<F: Float> $Op<&Real<F>> for &Real<F> {
            type Output = Real<F>;
            #[inline]
            fn $op(self, rhs: &Real<F>) -> Real<F> {
                let mut r = Real::default();
                r.binary($code, self, rhs);
                r
            }
        }

        impl<F: Float> $Op<Real<F>> for &Real<F> {
            type Output = Real<F>;
            #[inline]
            fn $op(self, rhs: Real<F>) -> Real<F> {
                let mut r = Real::default();
                r.binary($code, self, &rhs);
                r
            }
        }

        impl<F: Float> $OpAssign<&Real<F>> for Real<F> {
            #[inline]
            fn $op_assign(&mut self, rhs: &Real<F>) {
                self.binary_assign($code, rhs);
            }
        }

        impl<F: Float> $OpAssign for Real<F> {
            #[inline]
            fn $op_assign(&mut self, rhs: Real<F>) {
                self.binary_assign($code, &rhs);
            }
        }
    };
}

impl_real_binop!(Add, add, AddAssign, add_assign, BinaryOp::Add);
impl_real_binop!(Sub, sub, SubAssign, sub_assign, BinaryOp::Sub);
impl_real_binop!(Mul, mul, MulAssign, mul_assign, BinaryOp::Mul);
impl_real_binop!(Div, div, DivAssign, div_assign, BinaryOp::Div);

impl<F: Float> Neg for Real<F> {
    type Output = Real<F>;
    #[inline]
    fn neg(mut self) -> Real<F> {
        self.unary_assign(UnaryOp::Neg);
        self
    }
}

impl<F: Float> Neg for &Real<F> {
    type Output = Real<F>;
    #[inline]
    fn neg(self) -> Real<F> {
        let mut r = Real::default();
        r.unary(UnaryOp::Neg, self);
        r
    }
}

// ──────────────────────────────────────────────
//  Mixed ops with primitive floats
// ──────────────────────────────────────────────

macro_rules! impl_real_float_ops {
    ($f:ty) => {
        impl_real_float_ops!(@rhs $f, Add, add, AddAssign, add_assign, BinaryOp::Add);
        impl_real_float_ops!(@rhs $f, Sub, sub, SubAssign, sub_assign, BinaryOp::Sub);
        impl_real_float_ops!(@rhs $f, Mul, mul, MulAssign, mul_assign, BinaryOp::Mul);
        impl_real_float_ops!(@rhs $f, Div, div, DivAssign, div_assign, BinaryOp::Div);

        // c + x and c * x commute onto the right operand's buffers.
        impl Add<Real<$f>> for $f {
            type Output = Real<$f>;
            #[inline]
            fn add(self, mut rhs: Real<$f>) -> Real<$f> {
                rhs.binary_assign(BinaryOp::Add, &self);
                rhs
            }
        }

        impl Mul<Real<$f>> for $f {
            type Output = Real<$f>;
            #[inline]
            fn mul(self, mut rhs: Real<$f>) -> Real<$f> {
                rhs.binary_assign(BinaryOp::Mul, &self);
                rhs
            }
        }

        // c - x = (-x) + c
        impl Sub<Real<$f>> for $f {
            type Output = Real<$f>;
            #[inline]
            fn sub(self, mut rhs: Real<$f>) -> Real<$f> {
                rhs.unary_assign(UnaryOp::Neg);
                rhs.binary_assign(BinaryOp::Add, &self);
                rhs
            }
        }

        // c / x = (1/x) * c
        impl Div<Real<$f>> for $f {
            type Output = Real<$f>;
            #[inline]
            fn div(self, mut rhs: Real<$f>) -> Real<$f> {
                rhs.unary_assign(UnaryOp::Recip);
                rhs.binary_assign(BinaryOp::Mul, &self);
                rhs
            }
        }

        impl_real_float_ops!(@lhs_ref $f, Add, add, BinaryOp::Add);
        impl_real_float_ops!(@lhs_ref $f, Sub, sub, BinaryOp::Sub);
        impl_real_float_ops!(@lhs_ref $f, Mul, mul, BinaryOp::Mul);
        impl_real_float_ops!(@lhs_ref $f, Div, div, BinaryOp::Div);
    };

    (@rhs $f:ty, $Op:ident, $op:ident, $OpAssign:ident, $op_assign:ident, $code:expr) => {
        impl $Op<$f> for Real<$f> {
            type Output = Real<$f>;
            #[inline]
            fn $op(mut self, rhs: $f) -> Real<$f> {
                self.binary_assign($code, &rhs);
                self
            }
        }

        impl $Op<$f> for &Real<$f> {
            type Output = Real<$f>;
            #[inline]
            fn $op(self, rhs: $f) -> Real<$f> {
                let mut r = Real::default();
                r.binary($code, self, &rhs);
                r
            }
        }

        impl $OpAssign<$f> for Real<$f> {
            #[inline]
            fn $op_assign(&mut self, rhs: $f) {
                self.binary_assign($code, &rhs);
            }
        }
    };

    (@lhs_ref $f:ty, $Op:ident, $op:ident, $code:expr) => {
        impl $Op<&Real<$f>> for $f {
            type Output = Real<$f>;
            #[inline]
            fn $op(self, rhs: &Real<$f>) -> Real<$f> {
                let mut r = Real::default();
                r.binary($code, &self, rhs);
                r
            }
        }
    };
}

impl_real_float_ops!(f32);
impl_real_float_ops!(f64);
