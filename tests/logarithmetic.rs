use approx::assert_relative_eq;
use numbat::{log_add, log_sub, ConstScalar, Order, Real64, Scalar};

fn logs() -> (Real64, Real64) {
    (
        Real64::variable(2.3_f64.ln(), 0, 2, Order::Two),
        Real64::variable(1.2_f64.ln(), 1, 2, Order::Two),
    )
}

#[test]
fn float_helpers() {
    let (a, b) = (2.3_f64.ln(), 1.2_f64.ln());
    assert_relative_eq!(log_add(a, b), 3.5_f64.ln(), max_relative = 1e-12);
    assert_relative_eq!(log_add(b, a), 3.5_f64.ln(), max_relative = 1e-12);
    assert_relative_eq!(log_sub(a, b), 1.1_f64.ln(), max_relative = 1e-12);
    assert_eq!(log_add(f64::NEG_INFINITY, b), b);
    assert_eq!(log_sub(a, f64::NEG_INFINITY), a);
}

#[test]
fn large_arguments_do_not_overflow() {
    assert_relative_eq!(log_add(1000.0_f64, 1000.0), 1000.0 + 2.0_f64.ln(), max_relative = 1e-12);
    assert!(log_add(-1000.0_f64, -1001.0).is_finite());
}

#[test]
fn log_add_gradient() {
    let (a, b) = logs();
    let mut r = Real64::default();
    let mut t = Real64::default();
    r.log_add(&a, &b, &mut t);
    assert_relative_eq!(r.value(), 3.5_f64.ln(), max_relative = 1e-12);
    assert_relative_eq!(r.derivative(0), 2.3 / 3.5, max_relative = 1e-12);
    assert_relative_eq!(r.derivative(1), 1.2 / 3.5, max_relative = 1e-12);
    // softmax curvature: p(1 - p) on the diagonal, -pq off it
    let (p, q) = (2.3 / 3.5, 1.2 / 3.5);
    assert_relative_eq!(r.hessian(0, 0), p * (1.0 - p), max_relative = 1e-10);
    assert_relative_eq!(r.hessian(0, 1), -p * q, max_relative = 1e-10);
}

#[test]
fn log_add_is_symmetric() {
    let (a, b) = logs();
    let (mut r, mut s, mut t) = (Real64::default(), Real64::default(), Real64::default());
    r.log_add(&a, &b, &mut t);
    s.log_add(&b, &a, &mut t);
    assert_relative_eq!(r.value(), s.value(), max_relative = 1e-15);
    assert_relative_eq!(r.derivative(0), s.derivative(0), max_relative = 1e-12);
}

#[test]
fn log_sub_gradient() {
    let (a, b) = logs();
    let mut r = Real64::default();
    let mut t = Real64::default();
    r.log_sub(&a, &b, &mut t);
    assert_relative_eq!(r.value(), 1.1_f64.ln(), max_relative = 1e-12);
    assert_relative_eq!(r.derivative(0), 2.3 / 1.1, max_relative = 1e-12);
    assert_relative_eq!(r.derivative(1), -1.2 / 1.1, max_relative = 1e-12);
}

#[test]
fn neg_infinity_operands() {
    let (a, _) = logs();
    let ninf = Real64::new(f64::NEG_INFINITY);
    let mut r = Real64::default();
    let mut t = Real64::default();

    r.log_add(&ninf, &a, &mut t);
    assert_eq!(r, a);
    r.log_add(&a, &ninf, &mut t);
    assert_eq!(r, a);
    r.log_sub(&a, &ninf, &mut t);
    assert_eq!(r, a);
}

#[test]
fn log1p_exp_across_ranges() {
    for &x in &[-40.0_f64, -2.0, 0.5, 20.0, 40.0] {
        let v = Real64::variable(x, 0, 1, Order::One);
        let mut r = Real64::default();
        r.log1p_exp(&v);
        let logistic = 1.0 / (1.0 + (-x).exp());
        assert_relative_eq!(r.value(), x.exp().ln_1p(), max_relative = 1e-12);
        assert_relative_eq!(r.derivative(0), logistic, max_relative = 1e-12);
    }
}

#[test]
fn sigmoid_matches_logistic() {
    for &x in &[-3.0_f64, 0.0, 0.7] {
        let v = Real64::variable(x, 0, 1, Order::Two);
        let (mut r, mut t, mut l) = (Real64::default(), Real64::default(), Real64::default());
        r.sigmoid(&v, &mut t);
        l.logistic(&v);
        let s = 1.0 / (1.0 + (-x).exp());
        assert_relative_eq!(r.value(), s, max_relative = 1e-12);
        assert_relative_eq!(r.derivative(0), s * (1.0 - s), max_relative = 1e-12);
        assert_relative_eq!(r.hessian(0, 0), l.hessian(0, 0), epsilon = 1e-14, max_relative = 1e-10);
    }
}

#[test]
fn sigmoid_of_large_negative_is_finite() {
    let v = Real64::variable(-800.0, 0, 1, Order::One);
    let (mut r, mut t) = (Real64::default(), Real64::default());
    r.sigmoid(&v, &mut t);
    assert!(r.value().is_finite());
    assert!(r.derivative(0).is_finite());
}
