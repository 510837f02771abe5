//! Serialization of [`Real`] and [`DenseVector`].
//!
//! A `Real` whose derivatives are all zero is written as a bare number, so a
//! freshly reset value looks exactly like a plain float. Otherwise it becomes
//! a map with `Value` and whichever of `Derivative` and `Hessian` (as nested
//! rows) hold a nonzero entry.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::float::Float;
use crate::order::Order;
use crate::real::Real;
use crate::scalar::Scalar;
use crate::vector::DenseVector;

impl<F: Float + Serialize> Serialize for Real<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let has_gradient = self.derivative.iter().any(|d| !d.is_zero());
        let has_hessian = self.hessian.iter().any(|h| !h.is_zero());
        if !has_gradient && !has_hessian {
            return self.value.serialize(serializer);
        }
        let len = 1 + usize::from(has_gradient) + usize::from(has_hessian);
        let mut m = serializer.serialize_map(Some(len))?;
        m.serialize_entry("Value", &self.value)?;
        if has_gradient {
            m.serialize_entry("Derivative", &self.derivative)?;
        }
        if has_hessian {
            let rows: Vec<&[F]> = self.hessian.chunks(self.n).collect();
            m.serialize_entry("Hessian", &rows)?;
        }
        m.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr<F> {
    Bare(F),
    Full {
        #[serde(rename = "Value")]
        value: F,
        #[serde(rename = "Derivative", default)]
        derivative: Option<Vec<F>>,
        #[serde(rename = "Hessian", default)]
        hessian: Option<Vec<Vec<F>>>,
    },
}

impl<'de, F: Float + Deserialize<'de>> Deserialize<'de> for Real<F> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (value, derivative, hessian) = match Repr::<F>::deserialize(deserializer)? {
            Repr::Bare(value) => return Ok(Real::new(value)),
            Repr::Full {
                value,
                derivative,
                hessian,
            } => (value, derivative, hessian),
        };
        let n = match (&derivative, &hessian) {
            (Some(d), _) => d.len(),
            (None, Some(h)) => h.len(),
            (None, None) => return Ok(Real::new(value)),
        };
        let order = if hessian.is_some() { Order::Two } else { Order::One };
        let mut r = Real::new(value);
        r.n = n;
        r.order = order;
        r.derivative = derivative.unwrap_or_else(|| vec![F::zero(); n]);
        if let Some(rows) = hessian {
            if rows.len() != n || rows.iter().any(|row| row.len() != n) {
                return Err(D::Error::custom(format!(
                    "Hessian must be {n}x{n} to match {n} variables"
                )));
            }
            r.hessian = rows.into_iter().flatten().collect();
        }
        Ok(r)
    }
}

impl<T: Scalar + Serialize> Serialize for DenseVector<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_slice().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for DenseVector<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(DenseVector::from)
    }
}
