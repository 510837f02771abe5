use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use log::trace;

use crate::error::{Error, Result};
use crate::order::Order;
use crate::scalar::Differentiable;

static NEXT_SPACE: AtomicU64 = AtomicU64::new(1);

/// Identity of the derivative space a seeded element belongs to.
///
/// Every call to [`variables`] opens a new space. Results inherit the space of
/// their active operands, and the engine panics when two active operands come
/// from different spaces, since their derivative indices name unrelated
/// variables. Elements built by hand with [`Real::variable`](crate::Real::variable)
/// or deserialized are [`UNBOUND`](SpaceId::UNBOUND) and combine with any space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SpaceId(u64);

impl SpaceId {
    /// No seeded space: constants, zeroed derivatives, hand-built variables.
    pub const UNBOUND: SpaceId = SpaceId(0);

    pub(crate) fn fresh() -> Self {
        SpaceId(NEXT_SPACE.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn is_bound(self) -> bool {
        self != Self::UNBOUND
    }

    /// The space of a result computed from operands in `self` and `other`.
    ///
    /// # Panics
    ///
    /// If both are bound to different spaces.
    #[inline]
    pub(crate) fn join(self, other: SpaceId) -> SpaceId {
        match (self.is_bound(), other.is_bound()) {
            (true, true) => {
                assert!(
                    self == other,
                    "operands belong to different derivative spaces ({self} and {other}); \
                     seed one combined vector and slice it"
                );
                self
            }
            (true, false) => self,
            _ => other,
        }
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Seed `xs` as the independent variables of one derivative space.
///
/// Element `i` gets buffers for `xs.len()` variables at `order`, zero-filled,
/// with `∂xs[i]/∂x_i = 1`.
///
/// All elements that take part in one computation must come from a single
/// call. Two separately seeded vectors use overlapping indices for unrelated
/// variables; to share a space, seed one combined vector and slice it
/// afterwards. Each call binds `xs` to a fresh [`SpaceId`], and combining
/// active elements of two different calls panics.
///
/// # Errors
///
/// - [`Error::UnsupportedOrder`] if `order > 2`.
/// - [`Error::DerivativeSpaceMismatch`] if an element already tracks
///   derivatives for a different number of variables. Re-seeding the same
///   vector is allowed.
///
/// Nothing is modified when an error is returned.
///
/// ```
/// use numbat::{variables, ConstScalar, Real64};
///
/// let mut xs = vec![Real64::new(1.0), Real64::new(2.0)];
/// variables(1, &mut xs).unwrap();
/// assert_eq!(xs[1].derivatives(), &[0.0, 1.0]);
/// ```
pub fn variables<T: Differentiable>(order: usize, xs: &mut [T]) -> Result<()> {
    let order = Order::try_from(order)?;
    let n = xs.len();
    if let Some((index, x)) = xs
        .iter()
        .enumerate()
        .find(|(_, x)| x.order().has_gradient() && x.num_variables() != n)
    {
        return Err(Error::DerivativeSpaceMismatch {
            index,
            expected: n,
            found: x.num_variables(),
        });
    }
    let space = if order.has_gradient() { SpaceId::fresh() } else { SpaceId::UNBOUND };
    trace!("seeding {n} variables at order {order} in space {space}");
    for (i, x) in xs.iter_mut().enumerate() {
        x.set_variable(i, n, order.as_usize())?;
        x.bind_space(space);
    }
    Ok(())
}
