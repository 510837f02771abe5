#![cfg(feature = "ndarray")]

use ndarray::{array, Array2};
use numbat::{gradient_ndarray, hessian_ndarray, jacobian_ndarray, DenseMatrix, DenseVector, Real64};

fn rosenbrock(x: &[Real64]) -> Real64 {
    let dx = &x[0] - 1.0;
    let t = &x[1] - &x[0] * &x[0];
    &dx * &dx + 100.0 * (&t * &t)
}

#[test]
fn gradient_of_rosenbrock() {
    let (v, g) = gradient_ndarray(rosenbrock, &array![1.0, 2.0]);
    // df/dx = 2(x-1) - 400x(y-x²), df/dy = 200(y-x²)
    assert_eq!(v, 100.0);
    assert!((g[0] - -400.0).abs() < 1e-10, "g[0]={}", g[0]);
    assert!((g[1] - 200.0).abs() < 1e-10, "g[1]={}", g[1]);
}

#[test]
fn hessian_of_rosenbrock() {
    let (_, _, h) = hessian_ndarray(rosenbrock, &array![1.0, 2.0]);
    // [[2 - 400(y - 3x²), -400x], [-400x, 200]] at (1, 2)
    let expected = array![[402.0, -400.0], [-400.0, 200.0]];
    for ((i, j), &e) in expected.indexed_iter() {
        assert!((h[[i, j]] - e).abs() < 1e-10, "h[{i},{j}]={}", h[[i, j]]);
    }
}

#[test]
fn jacobian_shape_is_outputs_by_inputs() {
    let j = jacobian_ndarray(
        |x: &[Real64]| vec![&x[0] * &x[1], &x[1] * &x[1], &x[0] + 0.0],
        &array![3.0, 4.0],
    );
    assert_eq!(j.dim(), (3, 2));
    assert_eq!(j, array![[4.0, 3.0], [0.0, 8.0], [1.0, 0.0]]);
}

#[test]
fn container_conversions() {
    let a = array![1.0, 2.0, 3.0];
    let v = DenseVector::<Real64>::from_array(&a);
    assert_eq!(v.values(), vec![1.0, 2.0, 3.0]);
    assert_eq!(v.to_array(), a);

    let m: Array2<f64> = array![[1.0, 2.0], [3.0, 4.0]];
    let d = DenseMatrix::<f64>::from_array(&m);
    assert_eq!(d[(1, 0)], 3.0);
    assert_eq!(d.to_array(), m);
}
