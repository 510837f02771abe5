use std::fmt::{self, Display};

use crate::error::Error;

/// Highest derivative degree tracked by a scalar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Order {
    /// Value only.
    #[default]
    Zero,
    /// Value and gradient.
    One,
    /// Value, gradient and Hessian.
    Two,
}

impl Order {
    /// Numeric degree (0, 1 or 2).
    #[inline]
    pub fn as_usize(self) -> usize {
        match self {
            Order::Zero => 0,
            Order::One => 1,
            Order::Two => 2,
        }
    }

    /// Whether a gradient buffer is present at this order.
    #[inline]
    pub fn has_gradient(self) -> bool {
        self >= Order::One
    }

    /// Whether a Hessian buffer is present at this order.
    #[inline]
    pub fn has_hessian(self) -> bool {
        self == Order::Two
    }
}

impl TryFrom<usize> for Order {
    type Error = Error;

    fn try_from(order: usize) -> Result<Self, Error> {
        match order {
            0 => Ok(Order::Zero),
            1 => Ok(Order::One),
            2 => Ok(Order::Two),
            n => Err(Error::UnsupportedOrder(n)),
        }
    }
}

impl From<Order> for usize {
    fn from(order: Order) -> usize {
        order.as_usize()
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_usize())
    }
}
