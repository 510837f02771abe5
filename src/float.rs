use std::fmt::{Debug, Display, LowerExp};

use num_traits::{Float as NumFloat, FloatConst, FromPrimitive};

use crate::scalar::Scalar;

/// Marker trait for base floating-point types (`f32`, `f64`).
///
/// Bundles the numeric and utility traits needed throughout numbat.
/// Only primitive float types implement this, `Real` does not. Every base
/// float is also a non-differentiable [`Scalar`] element, so a plain constant
/// can be passed anywhere an operand is expected.
pub trait Float:
    NumFloat
    + FloatConst
    + FromPrimitive
    + Copy
    + Send
    + Sync
    + Default
    + Debug
    + Display
    + LowerExp
    + Scalar<Float = Self>
    + 'static
{
}

impl Float for f32 {}
impl Float for f64 {}
