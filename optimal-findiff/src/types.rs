//! Types for finite differences.

use derive_more::Display;
use derive_num_bounded::{derive_into_inner, derive_new_from_lower_bounded_float};
use num_traits::{bounds::LowerBounded, AsPrimitive, Float};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Base step-size for finite differences,
/// `h`,
/// a positive normal float.
///
/// The step for each coordinate
/// is derived from this value,
/// see [`crate::step_size`].
#[derive(Clone, Copy, Debug, Display, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GradStep<A>(A);

derive_new_from_lower_bounded_float!(GradStep<A: Float>);
derive_into_inner!(GradStep<A>);

impl<A> LowerBounded for GradStep<A>
where
    A: Float,
{
    fn min_value() -> Self {
        Self(A::min_positive_value())
    }
}

impl<A> Default for GradStep<A>
where
    A: 'static + Copy,
    f64: AsPrimitive<A>,
{
    fn default() -> Self {
        Self(1e-5.as_())
    }
}
