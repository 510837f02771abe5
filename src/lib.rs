//! Forward-mode automatic differentiation up to second order.
//!
//! [`Real`] carries a value together with its gradient and Hessian with
//! respect to a fixed set of independent variables. Arithmetic on it applies
//! the chain rule, so one evaluation of a composed function yields the full
//! gradient and Hessian.
//!
//! Numeric code is written against the capability tiers in [`scalar`]
//! ([`ConstScalar`], [`Scalar`], [`Differentiable`]) and the container traits
//! in [`vector`] and [`matrix`]; the kernels in [`linalg`] then run unchanged
//! over plain floats and `Real`s, dense and sparse storage.
//!
//! ```
//! let (v, g, h) = numbat::hessian(|x: &[numbat::Real64]| {
//!     &(&x[0] * &x[0]) * &x[1]
//! }, &[3.0, 2.0]);
//! assert_eq!(v, 18.0);
//! assert_eq!(g, vec![12.0, 9.0]);
//! assert_eq!(h, vec![vec![4.0, 6.0], vec![6.0, 0.0]]);
//! ```

pub mod api;
mod engine;
pub mod error;
pub mod float;
pub mod linalg;
pub mod logarithmetic;
pub mod matrix;
pub mod opcode;
pub mod order;
pub mod real;
pub mod scalar;
pub mod seed;
mod special;
mod traits;
pub mod vector;

#[cfg(feature = "ndarray")]
pub mod ndarray_support;

pub use api::{gradient, hessian, jacobian};
pub use error::{Error, Result};
pub use float::Float;
pub use logarithmetic::{log_add, log_sub};
pub use matrix::{ConstMatrix, DenseMatrix, Matrix, SparseMatrix};
pub use opcode::{BinaryOp, UnaryOp};
pub use order::Order;
pub use real::Real;
pub use scalar::{ConstScalar, Differentiable, Scalar};
pub use seed::{variables, SpaceId};
pub use vector::{ConstVector, DenseVector, SparseVector, Vector};

#[cfg(feature = "ndarray")]
pub use ndarray_support::{gradient_ndarray, hessian_ndarray, jacobian_ndarray};

/// Type alias for differentiable scalars over `f64`.
pub type Real64 = Real<f64>;
/// Type alias for differentiable scalars over `f32`.
pub type Real32 = Real<f32>;
