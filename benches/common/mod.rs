#![allow(dead_code)]

use numbat::{BinaryOp, Real64, Scalar};

// ─── Rosenbrock ────────────────────────────────────────────────────────────

pub fn rosenbrock_f64(x: &[f64]) -> f64 {
    let mut sum = 0.0;
    for i in 0..x.len() - 1 {
        let t1 = 1.0 - x[i];
        let t2 = x[i + 1] - x[i] * x[i];
        sum += t1 * t1 + 100.0 * t2 * t2;
    }
    sum
}

/// Same function written against the in-place interface, so the loop
/// allocates only while the temporaries size their buffers.
pub fn rosenbrock(x: &[Real64]) -> Real64 {
    let mut sum = Real64::default();
    let mut t = Real64::default();
    let mut sq = Real64::default();
    for i in 0..x.len() - 1 {
        t.sub(&1.0, &x[i]);
        sq.mul(&t, &t);
        sum.binary_assign(BinaryOp::Add, &sq);

        sq.mul(&x[i], &x[i]);
        t.sub(&x[i + 1], &sq);
        sq.mul(&t, &t);
        sq.binary_assign(BinaryOp::Mul, &100.0);
        sum.binary_assign(BinaryOp::Add, &sq);
    }
    sum
}

pub fn point(n: usize) -> Vec<f64> {
    (0..n).map(|i| 0.5 + 0.01 * i as f64).collect()
}
