use derive_getters::{Dissolve, Getters};
use num_traits::Float;
use optimal_findiff::{gradient, hessian};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    high_level::Optimum,
    linalg::Lu,
    low_level::infinite_norm,
    types::{GradStep, Termination},
};

/// Checks of a Newton-Raphson result,
/// made after the optimizer finished.
#[derive(Clone, Debug, PartialEq, Dissolve, Getters)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[dissolve(rename = "into_parts")]
pub struct Diagnosis<A> {
    /// Whether every coordinate of the point is finite.
    point_is_finite: bool,
    /// Objective value of the point.
    value: A,
    /// Why the optimizer stopped.
    termination: Termination,
    /// Number of iterations the optimizer ran.
    iterations: usize,
    /// Largest magnitude of the estimated derivatives at the point.
    gradient_norm: A,
    /// Determinant of the estimated second-derivatives at the point.
    ///
    /// Positive where the second-derivatives are positive definite,
    /// but also at maxima in even dimensions.
    determinant: A,
}

/// Problem found in a Newton-Raphson result.
#[derive(Clone, Copy, Debug, thiserror::Error, PartialEq)]
pub enum SuspectOptimumError<A> {
    /// Point has an infinite or NaN coordinate.
    #[error("point is not finite")]
    NonFinitePoint,
    /// Objective value is infinite or NaN.
    #[error("objective value {0} is not finite")]
    NonFiniteValue(A),
    /// Optimizer stopped by iteration limit
    /// instead of converging.
    #[error("stopped by iteration limit after {0} iterations")]
    IterationCap(usize),
    /// Hessian determinant is not above zero.
    ///
    /// Outside one dimension this check is a heuristic.
    /// A positive determinant does not confirm a minimum:
    /// a maximum in an even number of dimensions
    /// passes it as well.
    #[error("Hessian determinant {0} is not above zero")]
    NonPositiveCurvature(A),
}

/// Re-estimate derivatives at `optimum`
/// and report what may be wrong with it.
///
/// Evaluates `obj_func` `n + n + n^2` times
/// for a point of length `n`.
pub fn diagnose<A, X, F>(
    obj_func: &F,
    optimum: &Optimum<A>,
    grad_step: GradStep<A>,
    args: &X,
) -> Diagnosis<A>
where
    A: Float,
    X: ?Sized,
    F: Fn(&[A], &X) -> A,
{
    let derivatives = gradient(obj_func, &optimum.point, grad_step, optimum.value, args);
    let snd_derivatives = hessian(obj_func, &optimum.point, grad_step, &derivatives, args);
    Diagnosis {
        point_is_finite: optimum.point.iter().all(|x| x.is_finite()),
        value: optimum.value,
        termination: optimum.termination,
        iterations: optimum.iterations,
        gradient_norm: infinite_norm(derivatives),
        determinant: Lu::factor(snd_derivatives).determinant(),
    }
}

impl<A> Diagnosis<A>
where
    A: Float,
{
    /// Return the first problem found,
    /// if any.
    ///
    /// Problems are checked in order:
    /// non-finite point,
    /// non-finite value,
    /// iteration limit,
    /// curvature.
    pub fn check(&self) -> Result<(), SuspectOptimumError<A>> {
        if !self.point_is_finite {
            Err(SuspectOptimumError::NonFinitePoint)
        } else if !self.value.is_finite() {
            Err(SuspectOptimumError::NonFiniteValue(self.value))
        } else if self.termination == Termination::MaxIter {
            Err(SuspectOptimumError::IterationCap(self.iterations))
        } else if self.determinant.is_nan() || self.determinant <= A::zero() {
            Err(SuspectOptimumError::NonPositiveCurvature(self.determinant))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{MaxIter, NewtonRaphsonBuilder};

    use super::*;

    fn sphere(point: &[f64], _: &()) -> f64 {
        point.iter().map(|x| (x - 2.0).powi(2)).sum()
    }

    #[test]
    fn diagnose_should_accept_converged_minimum() {
        let optimum = NewtonRaphsonBuilder::default()
            .for_(sphere)
            .with_point(vec![0.0, 5.0])
            .start(&())
            .run();
        let diagnosis = diagnose(&sphere, &optimum, GradStep::default(), &());
        assert_eq!(diagnosis.check(), Ok(()));
        assert!(*diagnosis.gradient_norm() < 1e-3);
        assert!(*diagnosis.determinant() > 0.0);
    }

    #[test]
    fn diagnose_should_flag_nan_results() {
        let obj_func = |point: &[f64], _: &()| point[0].ln();
        let optimum = NewtonRaphsonBuilder::default()
            .max_iter(MaxIter::new(5).unwrap())
            .for_(obj_func)
            .with_point(vec![-1.0])
            .start(&())
            .run();
        let diagnosis = diagnose(&obj_func, &optimum, GradStep::default(), &());
        assert!(!diagnosis.point_is_finite());
        assert_eq!(diagnosis.check(), Err(SuspectOptimumError::NonFinitePoint));
    }

    #[test]
    fn diagnose_should_flag_iteration_cap() {
        let optimum = NewtonRaphsonBuilder::default()
            .max_iter(MaxIter::new(1).unwrap())
            .for_(|point: &[f64], _: &()| point[0].powi(4))
            .with_point(vec![10.0])
            .start(&())
            .run();
        let diagnosis = diagnose(
            &|point: &[f64], _: &()| point[0].powi(4),
            &optimum,
            GradStep::default(),
            &(),
        );
        assert_eq!(diagnosis.check(), Err(SuspectOptimumError::IterationCap(1)));
    }

    #[test]
    fn diagnose_should_flag_maxima() {
        let obj_func = |point: &[f64], _: &()| -point[0].powi(2);
        let optimum = Optimum {
            point: vec![0.0],
            value: 0.0,
            iterations: 1,
            termination: Termination::PointChange,
        };
        let diagnosis = diagnose(&obj_func, &optimum, GradStep::default(), &());
        assert!(matches!(
            diagnosis.check(),
            Err(SuspectOptimumError::NonPositiveCurvature(_))
        ));
    }

    #[test]
    fn diagnose_should_not_distinguish_maxima_of_two_coordinates() {
        let obj_func = |point: &[f64], _: &()| -point[0].powi(2) - point[1].powi(2);
        let optimum = Optimum {
            point: vec![0.0, 0.0],
            value: 0.0,
            iterations: 1,
            termination: Termination::PointChange,
        };
        let diagnosis = diagnose(&obj_func, &optimum, GradStep::default(), &());
        assert!(*diagnosis.determinant() > 0.0);
        assert_eq!(diagnosis.check(), Ok(()));
    }
}
