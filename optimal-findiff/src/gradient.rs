use num_traits::Float;

use crate::{step_size, GradStep};

/// Forward-difference gradient estimator
/// with its own scratch point.
///
/// Partial derivative `i` is estimated as
/// `(f(x + s_i e_i) - f(x)) / s_i`,
/// where `s_i` is [`step_size`] of `x_i`
/// and `e_i` is the `i`th unit vector.
/// Every perturbation starts from `x`,
/// never from a previously perturbed point.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientEstimator<A> {
    point: Vec<A>,
}

impl<A> GradientEstimator<A> {
    /// Return an estimator for points of length `len`.
    pub fn new(len: usize) -> Self
    where
        A: Float,
    {
        Self {
            point: vec![A::zero(); len],
        }
    }

    /// Return length of points this estimator accepts.
    pub fn len(&self) -> usize {
        self.point.len()
    }

    /// Return whether this estimator accepts only empty points.
    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// Write the estimated derivatives of `obj_func` at `point`
    /// into `derivatives`.
    ///
    /// - `obj_func`: objective function
    /// - `point`: point to differentiate at
    /// - `grad_step`: base step-size
    /// - `value`: `obj_func(point, args)`
    /// - `args`: auxiliary arguments for `obj_func`
    /// - `derivatives`: output, same length as `point`
    pub fn estimate_into<X, F>(
        &mut self,
        obj_func: &F,
        point: &[A],
        grad_step: GradStep<A>,
        value: A,
        args: &X,
        derivatives: &mut [A],
    ) where
        A: Float,
        X: ?Sized,
        F: Fn(&[A], &X) -> A,
    {
        debug_assert_eq!(point.len(), self.len());
        debug_assert_eq!(point.len(), derivatives.len());

        self.point.copy_from_slice(point);
        for (i, (x, d)) in point.iter().copied().zip(derivatives.iter_mut()).enumerate() {
            let step = step_size(grad_step, x);
            self.point[i] = x + step;
            *d = (obj_func(&self.point, args) - value) / step;
            self.point[i] = x;
        }
    }
}

/// Return the estimated derivatives of `obj_func` at `point`.
///
/// See [`GradientEstimator::estimate_into`].
pub fn gradient<A, X, F>(
    obj_func: &F,
    point: &[A],
    grad_step: GradStep<A>,
    value: A,
    args: &X,
) -> Vec<A>
where
    A: Float,
    X: ?Sized,
    F: Fn(&[A], &X) -> A,
{
    let mut derivatives = vec![A::zero(); point.len()];
    GradientEstimator::new(point.len()).estimate_into(
        obj_func,
        point,
        grad_step,
        value,
        args,
        &mut derivatives,
    );
    derivatives
}
