//! Types for Newton-Raphson.

use derive_more::{Display, Into};
use derive_num_bounded::{
    derive_from_str_from_try_into, derive_into_inner, derive_new_from_lower_bounded,
    derive_new_from_lower_bounded_float, derive_try_from_from_new,
};
use num_traits::{bounds::LowerBounded, AsPrimitive, Float};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use optimal_findiff::{GradStep, InvalidGradStepError};

/// Maximum number of iterations,
/// at least one.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash, Into)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "usize"))]
#[cfg_attr(feature = "serde", serde(try_from = "usize"))]
pub struct MaxIter(usize);

impl Default for MaxIter {
    fn default() -> Self {
        Self(5000)
    }
}

impl LowerBounded for MaxIter {
    fn min_value() -> Self {
        Self(1)
    }
}

derive_new_from_lower_bounded!(MaxIter(usize));
derive_into_inner!(MaxIter(usize));
derive_try_from_from_new!(MaxIter(usize));
derive_from_str_from_try_into!(MaxIter(usize));

/// Threshold on the change in objective value
/// between iterations,
/// below which the optimizer stops.
#[derive(Clone, Copy, Debug, Display, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FunTolerance<A>(A);

derive_new_from_lower_bounded_float!(FunTolerance<A: Float>);
derive_into_inner!(FunTolerance<A>);

impl<A> Default for FunTolerance<A>
where
    A: 'static + Copy,
    f64: AsPrimitive<A>,
{
    fn default() -> Self {
        Self(1e-6.as_())
    }
}

impl<A> LowerBounded for FunTolerance<A>
where
    A: Float,
{
    fn min_value() -> Self {
        Self(A::zero())
    }
}

/// Threshold on the largest change in any coordinate
/// between iterations,
/// below which the optimizer stops.
#[derive(Clone, Copy, Debug, Display, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PointTolerance<A>(A);

derive_new_from_lower_bounded_float!(PointTolerance<A: Float>);
derive_into_inner!(PointTolerance<A>);

impl<A> Default for PointTolerance<A>
where
    A: 'static + Copy,
    f64: AsPrimitive<A>,
{
    fn default() -> Self {
        Self(1e-5.as_())
    }
}

impl<A> LowerBounded for PointTolerance<A>
where
    A: Float,
{
    fn min_value() -> Self {
        Self(A::zero())
    }
}

/// Reason a Newton-Raphson optimizer stopped.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Termination {
    /// Objective value changed less than [`FunTolerance`].
    #[display(fmt = "objective value converged")]
    FunctionChange,
    /// No coordinate changed more than [`PointTolerance`].
    #[display(fmt = "point converged")]
    PointChange,
    /// [`MaxIter`] iterations ran.
    #[display(fmt = "iteration limit reached")]
    MaxIter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_iter_should_reject_zero() {
        assert_eq!(MaxIter::new(0), Err(InvalidMaxIterError(0)));
        assert_eq!(MaxIter::try_from(1).map(MaxIter::into_inner), Ok(1));
    }

    #[test]
    fn max_iter_should_parse_from_str() {
        assert_eq!("10".parse::<MaxIter>(), Ok(MaxIter(10)));
        assert_eq!(
            "0".parse::<MaxIter>(),
            Err(MaxIterFromStrError::TryInto(InvalidMaxIterError(0)))
        );
        assert!(matches!(
            "ten".parse::<MaxIter>(),
            Err(MaxIterFromStrError::FromStr(_))
        ));
    }

    #[test]
    fn tolerances_should_accept_zero() {
        assert_eq!(FunTolerance::new(0.0).map(FunTolerance::into_inner), Ok(0.0));
        assert_eq!(
            PointTolerance::new(0.0).map(PointTolerance::into_inner),
            Ok(0.0)
        );
    }

    #[test]
    fn tolerances_should_reject_negative_and_nan() {
        assert_eq!(
            FunTolerance::new(-1.0),
            Err(InvalidFunToleranceError::TooLow(-1.0))
        );
        assert!(matches!(
            FunTolerance::new(f64::NAN),
            Err(InvalidFunToleranceError::IsNan(_))
        ));
        assert_eq!(
            PointTolerance::new(-1e-9),
            Err(InvalidPointToleranceError::TooLow(-1e-9))
        );
        assert!(matches!(
            PointTolerance::new(f64::NAN),
            Err(InvalidPointToleranceError::IsNan(_))
        ));
    }

    #[test]
    fn defaults_should_match_documented_values() {
        assert_eq!(MaxIter::default().into_inner(), 5000);
        assert_eq!(FunTolerance::<f64>::default().into_inner(), 1e-6);
        assert_eq!(PointTolerance::<f64>::default().into_inner(), 1e-5);
    }
}
