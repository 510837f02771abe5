//! Chain-rule propagation for up to second order.
//!
//! Every primitive on [`Real`] funnels through one of four evaluators:
//! [`monadic`] and [`dyadic`] write a fresh result from borrowed operands,
//! [`monadic_in_place`] and [`dyadic_in_place`] overwrite their left operand.
//!
//! An operand below [`Order::One`] contributes no derivative terms at all, so a
//! partial that is undefined at a constant operand (`ln x` of a negative base
//! raised to a constant power) never reaches the result.
//!
//! Results inherit the [`SpaceId`] of their active operands. Two active
//! operands bound to different seeded spaces are a usage error and panic
//! before the result is touched.

use crate::float::Float;
use crate::opcode::{self, BinaryOp, Partials, UnaryOp};
use crate::order::Order;
use crate::real::Real;
use crate::scalar::{ConstScalar, Differentiable};
use crate::seed::SpaceId;

/// Borrowed derivative buffers of one operand. Entries outside the operand's
/// own space read as zero.
#[derive(Clone, Copy)]
struct Operand<'a, F> {
    order: Order,
    n: usize,
    d: &'a [F],
    h: &'a [F],
    space: SpaceId,
}

impl<'a, F: Float> Operand<'a, F> {
    fn of<A: ConstScalar<Float = F>>(a: &'a A) -> Self {
        Operand {
            order: a.order(),
            n: a.num_variables(),
            d: a.derivatives(),
            h: a.hessian_entries(),
            space: a.space(),
        }
    }

    #[inline]
    fn active(&self) -> bool {
        self.order.has_gradient()
    }

    /// Space this operand contributes to the result.
    #[inline]
    fn contributed_space(&self) -> SpaceId {
        if self.active() {
            self.space
        } else {
            SpaceId::UNBOUND
        }
    }

    #[inline]
    fn d(&self, i: usize) -> F {
        self.d.get(i).copied().unwrap_or_else(F::zero)
    }

    #[inline]
    fn h(&self, i: usize, j: usize) -> F {
        if i < self.n && j < self.n {
            self.h.get(i * self.n + j).copied().unwrap_or_else(F::zero)
        } else {
            F::zero()
        }
    }
}

/// `h_a·a_i + h_b·b_i`, restricted to the active operands.
#[inline]
fn gradient_entry<F: Float>(p: &Partials<F>, ua: bool, ub: bool, ai: F, bi: F) -> F {
    let mut s = F::zero();
    if ua {
        s = s + p.a * ai;
    }
    if ub {
        s = s + p.b * bi;
    }
    s
}

/// One Hessian entry of the dyadic chain rule, restricted to the active
/// operands. Each triple is `(x_i, x_j, x_ij)` for that operand.
#[inline]
fn hessian_entry<F: Float>(p: &Partials<F>, ua: bool, ub: bool, a: (F, F, F), b: (F, F, F)) -> F {
    let (ai, aj, aij) = a;
    let (bi, bj, bij) = b;
    let mut s = F::zero();
    if ua {
        s = s + p.aa * ai * aj + p.a * aij;
    }
    if ub {
        s = s + p.bb * bi * bj + p.b * bij;
    }
    if ua && ub {
        s = s + p.ab * (ai * bj + aj * bi);
    }
    s
}

/// `c = op(a)`. `c` takes the order and variable count of `a`.
pub(crate) fn monadic<F, A>(c: &mut Real<F>, op: UnaryOp, a: &A)
where
    F: Float,
    A: ConstScalar<Float = F>,
{
    let x = a.value();
    let r = opcode::eval_unary(op, x);
    let va = Operand::of(a);
    let n = va.n;
    c.alloc(n, va.order);
    c.space = va.contributed_space();
    if va.active() {
        let p = opcode::unary_partials(op, va.order, x, r);
        if va.order.has_hessian() {
            for i in 0..n {
                for j in 0..n {
                    c.hessian[i * n + j] = p.aa * va.d(i) * va.d(j) + p.a * va.h(i, j);
                }
            }
        }
        for i in 0..n {
            c.derivative[i] = p.a * va.d(i);
        }
    }
    c.value = r;
}

/// `c = op(c)`.
pub(crate) fn monadic_in_place<F: Float>(c: &mut Real<F>, op: UnaryOp) {
    let x = c.value;
    let r = opcode::eval_unary(op, x);
    let (n, order) = (c.n, c.order);
    if order.has_gradient() {
        let p = opcode::unary_partials(op, order, x, r);
        if order.has_hessian() {
            // the gradient is still the operand's here
            for i in 0..n {
                for j in 0..n {
                    let k = i * n + j;
                    c.hessian[k] = p.aa * c.derivative[i] * c.derivative[j] + p.a * c.hessian[k];
                }
            }
        }
        for d in c.derivative.iter_mut() {
            *d = p.a * *d;
        }
    }
    c.value = r;
}

/// `c = op(a, b)`. The result order and variable count are the larger of the
/// operands'.
pub(crate) fn dyadic<F, A, B>(c: &mut Real<F>, op: BinaryOp, a: &A, b: &B)
where
    F: Float,
    A: ConstScalar<Float = F>,
    B: ConstScalar<Float = F>,
{
    let (x, y) = (a.value(), b.value());
    let r = opcode::eval_binary(op, x, y);
    let (va, vb) = (Operand::of(a), Operand::of(b));
    let space = va.contributed_space().join(vb.contributed_space());
    let order = va.order.max(vb.order);
    let n = va.n.max(vb.n);
    c.alloc(n, order);
    c.space = space;
    if order.has_gradient() {
        let p = opcode::binary_partials(op, order, x, y, r);
        let (ua, ub) = (va.active(), vb.active());
        if order.has_hessian() {
            for i in 0..n {
                for j in 0..n {
                    c.hessian[i * n + j] = hessian_entry(
                        &p,
                        ua,
                        ub,
                        (va.d(i), va.d(j), va.h(i, j)),
                        (vb.d(i), vb.d(j), vb.h(i, j)),
                    );
                }
            }
        }
        for i in 0..n {
            c.derivative[i] = gradient_entry(&p, ua, ub, va.d(i), vb.d(i));
        }
    }
    c.value = r;
}

/// `c = op(c, b)`.
///
/// `c` is first widened to the combined variable count and order, keeping its
/// entries. Hessian entries are then rewritten from their own previous values
/// and the unchanged gradient, then the gradient, then the value.
pub(crate) fn dyadic_in_place<F, B>(c: &mut Real<F>, op: BinaryOp, b: &B)
where
    F: Float,
    B: ConstScalar<Float = F>,
{
    let (x, y) = (c.value, b.value());
    let r = opcode::eval_binary(op, x, y);
    let vb = Operand::of(b);
    // activity is decided before widening; zero-filled buffers are not an operand
    let ua = c.order.has_gradient();
    let ub = vb.active();
    let own = if ua { c.space } else { SpaceId::UNBOUND };
    c.space = own.join(vb.contributed_space());
    let order = c.order.max(vb.order);
    let n = c.n.max(vb.n);
    c.widen(n, order);
    if order.has_gradient() {
        let p = opcode::binary_partials(op, order, x, y, r);
        if order.has_hessian() {
            for i in 0..n {
                for j in 0..n {
                    let k = i * n + j;
                    c.hessian[k] = hessian_entry(
                        &p,
                        ua,
                        ub,
                        (c.derivative[i], c.derivative[j], c.hessian[k]),
                        (vb.d(i), vb.d(j), vb.h(i, j)),
                    );
                }
            }
        }
        for i in 0..n {
            c.derivative[i] = gradient_entry(&p, ua, ub, c.derivative[i], vb.d(i));
        }
    }
    c.value = r;
}
