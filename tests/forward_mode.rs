use approx::assert_relative_eq;
use numbat::{BinaryOp, ConstScalar, Order, Real64, Scalar, UnaryOp};

/// Central finite difference: (f(x+h) - f(x-h)) / 2h
fn finite_diff(f: impl Fn(f64) -> f64, x: f64) -> f64 {
    let h = 1e-6;
    (f(x + h) - f(x - h)) / (2.0 * h)
}

fn unary_at(op: UnaryOp, x: f64) -> Real64 {
    let a = Real64::variable(x, 0, 1, Order::Two);
    let mut r = Real64::default();
    r.unary(op, &a);
    r
}

/// Check an elemental's first derivative against finite differences of its
/// value, and its second derivative against finite differences of the first.
fn check_elemental(op: UnaryOp, x: f64) {
    let r = unary_at(op, x);
    let d1 = finite_diff(|x| unary_at(op, x).value(), x);
    let d2 = finite_diff(|x| unary_at(op, x).derivative(0), x);
    assert_relative_eq!(r.derivative(0), d1, epsilon = 1e-6, max_relative = 1e-6);
    assert_relative_eq!(r.hessian(0, 0), d2, epsilon = 1e-6, max_relative = 1e-6);
}

// ── Elementals ──

#[test]
fn elementals_match_finite_differences() {
    let cases = [
        (UnaryOp::Neg, 1.3),
        (UnaryOp::Recip, 1.7),
        (UnaryOp::Sqrt, 2.3),
        (UnaryOp::Exp, 0.7),
        (UnaryOp::Log, 2.0),
        (UnaryOp::Log1p, 0.4),
        (UnaryOp::Sin, 0.9),
        (UnaryOp::Cos, 0.9),
        (UnaryOp::Tan, 4.321),
        (UnaryOp::Sinh, 0.8),
        (UnaryOp::Cosh, 0.8),
        (UnaryOp::Tanh, 0.6),
        (UnaryOp::Erf, 0.23),
        (UnaryOp::Erfc, 0.23),
        (UnaryOp::LogErfc, 0.23),
        (UnaryOp::LogErfc, -1.4),
        (UnaryOp::LogErfc, 3.1),
        (UnaryOp::Gamma, 4.321),
        (UnaryOp::Gamma, 0.7),
        (UnaryOp::Lgamma, 2.6),
        (UnaryOp::Lgamma, 0.3),
        (UnaryOp::Mlgamma(3), 3.4),
        (UnaryOp::Abs, -2.0),
    ];
    for (op, x) in cases {
        check_elemental(op, x);
    }
}

#[test]
fn exp_and_log_closed_forms() {
    let r = unary_at(UnaryOp::Exp, 1.0);
    assert_relative_eq!(r.derivative(0), std::f64::consts::E, max_relative = 1e-12);
    let r = unary_at(UnaryOp::Log, 2.0);
    assert_relative_eq!(r.derivative(0), 0.5, max_relative = 1e-12);
    assert_relative_eq!(r.hessian(0, 0), -0.25, max_relative = 1e-12);
}

#[test]
fn tan_derivative_is_one_plus_tan_squared() {
    let r = unary_at(UnaryOp::Tan, 4.321);
    let t = 4.321_f64.tan();
    assert_relative_eq!(r.value(), t, max_relative = 1e-12);
    assert_relative_eq!(r.derivative(0), 1.0 + t * t, max_relative = 1e-12);
}

#[test]
fn tanh_in_place_matches_out_of_place() {
    let r = unary_at(UnaryOp::Tanh, 4.321);
    assert_relative_eq!(r.derivative(0), 0.00070588, max_relative = 1e-4);
    assert_relative_eq!(r.hessian(0, 0), -0.00141127, max_relative = 1e-4);

    let mut a = Real64::variable(4.321, 0, 1, Order::Two);
    a.unary_assign(UnaryOp::Tanh);
    assert_eq!(a, r);
}

#[test]
fn erf_and_erfc() {
    let r = unary_at(UnaryOp::Erf, 0.23);
    assert_relative_eq!(r.derivative(0), 1.07023926, max_relative = 1e-7);
    assert_relative_eq!(r.hessian(0, 0), -0.49231006, max_relative = 1e-7);

    let c = unary_at(UnaryOp::Erfc, 0.23);
    assert_relative_eq!(c.value(), 1.0 - r.value(), max_relative = 1e-12);
    assert_relative_eq!(c.derivative(0), -1.07023926, max_relative = 1e-7);
    assert_relative_eq!(c.hessian(0, 0), 0.49231006, max_relative = 1e-7);
}

#[test]
fn log_erfc_reference_values() {
    let r = unary_at(UnaryOp::LogErfc, 0.23);
    assert_relative_eq!(r.value(), libm::erfc(0.23).ln(), max_relative = 1e-12);
    assert_relative_eq!(r.derivative(0), -1.436606354, max_relative = 1e-8);
    assert_relative_eq!(r.hessian(0, 0), -1.402998894, max_relative = 1e-8);

    let mut a = Real64::variable(0.23, 0, 1, Order::Two);
    a.unary_assign(UnaryOp::LogErfc);
    assert_eq!(a, r);

    let x = Real64::variable(0.23, 0, 1, Order::Two);
    let mut named = Real64::default();
    named.log_erfc(&x);
    assert_eq!(named, r);
}

#[test]
fn log_erfc_far_tail_stays_finite() {
    // erfc(30) underflows, its logarithm does not
    let r = unary_at(UnaryOp::LogErfc, 30.0);
    assert!(r.value().is_finite());
    // for large x: d/dx ≈ -2x - 1/x, d²/dx² ≈ -2 + 1/x²
    assert_relative_eq!(r.derivative(0), -60.0 - 1.0 / 30.0, max_relative = 1e-6);
    assert_relative_eq!(r.hessian(0, 0), -2.0 + 1.0 / 900.0, max_relative = 1e-5);
}

#[test]
fn gamma_reference_values() {
    let r = unary_at(UnaryOp::Gamma, 4.321);
    assert_relative_eq!(r.derivative(0), 12.2353264, max_relative = 1e-8);
    assert_relative_eq!(r.hessian(0, 0), 18.8065398, max_relative = 1e-8);
    // Γ(5) = 4!
    assert_relative_eq!(unary_at(UnaryOp::Gamma, 5.0).value(), 24.0, max_relative = 1e-14);
}

#[test]
fn lgamma_is_log_of_gamma() {
    let g = unary_at(UnaryOp::Gamma, 2.6);
    let l = unary_at(UnaryOp::Lgamma, 2.6);
    assert_relative_eq!(l.value(), g.value().ln(), max_relative = 1e-13);
    assert_relative_eq!(l.derivative(0), g.derivative(0) / g.value(), max_relative = 1e-12);
    // ψ₁(1) = π²/6
    let one = unary_at(UnaryOp::Lgamma, 1.0);
    assert_relative_eq!(one.hessian(0, 0), std::f64::consts::PI.powi(2) / 6.0, max_relative = 1e-12);
}

#[test]
fn lgamma_of_negative_gamma_is_nan() {
    // Γ(-0.5) < 0
    assert!(unary_at(UnaryOp::Lgamma, -0.5).value().is_nan());
}

#[test]
fn mlgamma_reduces_to_lgamma() {
    let m = unary_at(UnaryOp::Mlgamma(1), 3.2);
    let l = unary_at(UnaryOp::Lgamma, 3.2);
    assert_relative_eq!(m.value(), l.value(), max_relative = 1e-14);
    assert_relative_eq!(m.derivative(0), l.derivative(0), max_relative = 1e-14);
    assert_relative_eq!(m.hessian(0, 0), l.hessian(0, 0), max_relative = 1e-14);

    let x = Real64::variable(3.2, 0, 1, Order::Two);
    let mut r = Real64::default();
    r.mlgamma(&x, 2);
    // ψ(x) + ψ(x - 1/2)
    let (a, b) = (unary_at(UnaryOp::Lgamma, 3.2), unary_at(UnaryOp::Lgamma, 2.7));
    assert_relative_eq!(r.derivative(0), a.derivative(0) + b.derivative(0), max_relative = 1e-12);
}

#[test]
fn abs_has_sign_slope() {
    assert_eq!(unary_at(UnaryOp::Abs, -2.0).derivative(0), -1.0);
    assert_eq!(unary_at(UnaryOp::Abs, 3.0).derivative(0), 1.0);
    assert_eq!(unary_at(UnaryOp::Abs, 0.0).derivative(0), 0.0);
}

#[test]
fn order_zero_skips_partials() {
    // partials of log at a negative point are NaN, but nothing is tracked
    let a = Real64::new(-1.0);
    let mut r = Real64::default();
    r.log(&a);
    assert!(r.value().is_nan());
    assert_eq!(r.order(), Order::Zero);
    assert!(r.derivatives().is_empty());
}

// ── Arithmetic ──

#[test]
fn polynomial() {
    // f = 2x³ + 4 at x = 9
    let x = Real64::variable(9.0, 0, 1, Order::Two);
    let y = 2.0 * (&x * &x * &x) + 4.0;
    assert_relative_eq!(y.value(), 1462.0);
    assert_relative_eq!(y.derivative(0), 486.0);
    assert_relative_eq!(y.hessian(0, 0), 108.0);
}

#[test]
fn repeated_in_place_multiplication() {
    let mut a = Real64::variable(13.123, 0, 1, Order::Two);
    let b = 4.321;
    a *= a.clone();
    a *= a.clone();
    a *= b;
    assert_relative_eq!(a.value(), 128149.4603376, max_relative = 1e-10);
    assert_relative_eq!(a.derivative(0), 39061.025783, max_relative = 1e-9);
    assert_relative_eq!(a.hessian(0, 0), 8929.5951649, max_relative = 1e-9);
}

#[test]
fn quotient_rule() {
    // d/dx (x / (x+1)) at x=2: 1/(x+1)² = 1/9, d² = -2/(x+1)³
    let x = Real64::variable(2.0, 0, 1, Order::Two);
    let y = &x / (&x + 1.0);
    assert_relative_eq!(y.value(), 2.0 / 3.0, max_relative = 1e-12);
    assert_relative_eq!(y.derivative(0), 1.0 / 9.0, max_relative = 1e-12);
    assert_relative_eq!(y.hessian(0, 0), -2.0 / 27.0, max_relative = 1e-12);
}

#[test]
fn mixed_float_ops() {
    let x = Real64::variable(3.0, 0, 1, Order::One);

    let z = 2.0 * x.clone();
    assert_relative_eq!(z.value(), 6.0);
    assert_relative_eq!(z.derivative(0), 2.0);

    let w = 1.0 / x.clone();
    assert_relative_eq!(w.value(), 1.0 / 3.0, max_relative = 1e-12);
    assert_relative_eq!(w.derivative(0), -1.0 / 9.0, max_relative = 1e-12);

    let s = 1.0 - &x;
    assert_relative_eq!(s.value(), -2.0);
    assert_relative_eq!(s.derivative(0), -1.0);

    let mut u = x.clone();
    u -= 1.0;
    u /= 2.0;
    assert_relative_eq!(u.value(), 1.0);
    assert_relative_eq!(u.derivative(0), 0.5);

    let n = -&x;
    assert_relative_eq!(n.derivative(0), -1.0);
}

#[test]
fn pow_with_both_operands_variable() {
    let (x0, k0) = (3.4_f64, 4.1_f64);
    let x = Real64::variable(x0, 0, 2, Order::Two);
    let k = Real64::variable(k0, 1, 2, Order::Two);
    let mut r = Real64::default();
    r.pow(&x, &k);

    let v = x0.powf(k0);
    let ln = x0.ln();
    assert_relative_eq!(r.value(), v, max_relative = 1e-12);
    assert_relative_eq!(r.derivative(0), 182.124553, max_relative = 1e-8);
    assert_relative_eq!(r.derivative(1), 184.826947, max_relative = 1e-8);
    assert_relative_eq!(r.derivative(1), v * ln, max_relative = 1e-12);
    assert_relative_eq!(r.hessian(0, 0), 166.054739, max_relative = 1e-8);
    assert_relative_eq!(r.hessian(1, 1), 226.186676, max_relative = 1e-8);
    let cross = x0.powf(k0 - 1.0) * (1.0 + k0 * ln);
    assert_relative_eq!(r.hessian(0, 1), cross, max_relative = 1e-12);
    assert_eq!(r.hessian(0, 1), r.hessian(1, 0));
}

#[test]
fn pow_negative_base_constant_exponent() {
    let x = Real64::variable(-3.4, 0, 1, Order::Two);
    let mut r = Real64::default();
    r.pow(&x, &4.0);
    assert_relative_eq!(r.derivative(0), -157.216, max_relative = 1e-12);
    assert_relative_eq!(r.hessian(0, 0), 138.72, max_relative = 1e-12);
}

#[test]
fn pow_negative_base_variable_exponent_is_nan() {
    let x = Real64::variable(-3.4, 0, 2, Order::One);
    let k = Real64::variable(4.0, 1, 2, Order::One);
    let mut r = Real64::default();
    r.pow(&x, &k);
    // ∂/∂k = x^k ln x is NaN for x < 0 and poisons every chain-rule sum
    assert_relative_eq!(r.value(), 3.4_f64.powi(4), max_relative = 1e-12);
    assert!(r.derivative(0).is_nan());
    assert!(r.derivative(1).is_nan());
}

#[test]
fn min_and_max_copy_the_selected_operand() {
    let a = Real64::variable(1.0, 0, 2, Order::One);
    let b = Real64::variable(2.0, 1, 2, Order::One);
    let mut r = Real64::default();
    Scalar::max(&mut r, &a, &b);
    assert_eq!(r, b);
    Scalar::min(&mut r, &a, &b);
    assert_eq!(r, a);
}

#[test]
fn first_order_result_has_no_hessian() {
    let x = Real64::variable(0.5, 0, 1, Order::One);
    let mut r = Real64::default();
    r.sin(&x);
    assert_eq!(r.order(), Order::One);
    assert!(r.hessian_entries().is_empty());
    assert_eq!(r.hessian(0, 0), 0.0);
    assert_relative_eq!(r.derivative(0), 0.5_f64.cos(), max_relative = 1e-12);
}

#[test]
fn binary_assign_with_wider_operand() {
    // a knows one variable, b two: the result lives in the larger space
    let mut a = Real64::variable(2.0, 0, 1, Order::Two);
    let b = Real64::variable(3.0, 1, 2, Order::Two);
    a.binary_assign(BinaryOp::Mul, &b);
    assert_eq!(a.num_variables(), 2);
    assert_eq!(a.derivatives(), &[3.0, 2.0]);
    assert_eq!(a.hessian(0, 1), 1.0);
    assert_eq!(a.hessian(1, 0), 1.0);
}

#[test]
fn plain_floats_are_scalars() {
    let mut r = 0.0_f64;
    Scalar::mul(&mut r, &3.0, &4.0);
    assert_eq!(r, 12.0);
    r.unary_assign(UnaryOp::Sqrt);
    assert_relative_eq!(r, 12.0_f64.sqrt());
    assert_eq!(ConstScalar::order(&r), Order::Zero);
    assert_eq!(ConstScalar::derivative(&r, 5), 0.0);
}

#[test]
fn f32_elements() {
    let x = numbat::Real32::variable(2.0, 0, 1, Order::Two);
    let mut r = numbat::Real32::default();
    r.exp(&x);
    assert_relative_eq!(r.derivative(0), 2.0_f32.exp(), max_relative = 1e-6);
    assert_relative_eq!(r.hessian(0, 0), 2.0_f32.exp(), max_relative = 1e-6);
}

#[test]
fn display_uses_exponent_notation() {
    let x = Real64::new(1234.5);
    assert_eq!(x.to_string(), "1.2345e3");
}

#[test]
fn comparisons_read_values_only() {
    let a = Real64::variable(1.0, 0, 1, Order::One);
    let b = Real64::new(1.0 + 1e-12);
    assert!(a.equals(&b, 1e-9));
    assert!(b.greater(&a));
    assert!(a.smaller(&b));
    assert_eq!(Real64::new(-3.0).sign(), -1);
    assert_eq!(Real64::new(0.0).sign(), 0);
    assert_relative_eq!(Real64::new(2.0).log_value(), 2.0_f64.ln());

    // plain floats go through the same provided methods
    assert!(ConstScalar::equals(&2.0_f64, &(2.0 - 1e-12), 1e-9));
    assert!(!ConstScalar::equals(&2.0_f64, &-2.0, 1e-9));
    assert_eq!(ConstScalar::sign(&-0.5_f64), -1);
    assert_eq!(ConstScalar::derivative(&7.0_f64, 0), 0.0);
    assert_eq!(ConstScalar::hessian(&7.0_f32, 0, 0), 0.0);
}
