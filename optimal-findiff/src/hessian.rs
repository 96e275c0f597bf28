use ndarray::Array2;
use num_traits::Float;

use crate::{step_size, GradStep, GradientEstimator};

/// Hessian estimator
/// differencing forward-difference gradients.
///
/// Column `i` is estimated as
/// `(g(x + s_i e_i) - g(x)) / s_i`,
/// where `g` is the gradient from [`GradientEstimator`].
/// The result is not symmetrized.
#[derive(Clone, Debug, PartialEq)]
pub struct HessianEstimator<A> {
    point: Vec<A>,
    derivatives: Vec<A>,
    gradient: GradientEstimator<A>,
}

impl<A> HessianEstimator<A> {
    /// Return an estimator for points of length `len`.
    pub fn new(len: usize) -> Self
    where
        A: Float,
    {
        Self {
            point: vec![A::zero(); len],
            derivatives: vec![A::zero(); len],
            gradient: GradientEstimator::new(len),
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

    /// Write the estimated second-derivatives of `obj_func` at `point`
    /// into `snd_derivatives`.
    ///
    /// - `derivatives`: estimated derivatives at `point`,
    ///   as from [`GradientEstimator::estimate_into`]
    /// - `snd_derivatives`: output, `point.len()` by `point.len()`
    ///
    /// Each column costs `1 + point.len()` evaluations of `obj_func`.
    pub fn estimate_into<X, F>(
        &mut self,
        obj_func: &F,
        point: &[A],
        grad_step: GradStep<A>,
        derivatives: &[A],
        args: &X,
        snd_derivatives: &mut Array2<A>,
    ) where
        A: Float,
        X: ?Sized,
        F: Fn(&[A], &X) -> A,
    {
        debug_assert_eq!(point.len(), self.len());
        debug_assert_eq!(point.len(), derivatives.len());
        debug_assert_eq!(snd_derivatives.dim(), (point.len(), point.len()));

        self.point.copy_from_slice(point);
        for (i, x) in point.iter().copied().enumerate() {
            let step = step_size(grad_step, x);
            self.point[i] = x + step;
            let value = obj_func(&self.point, args);
            self.gradient.estimate_into(
                obj_func,
                &self.point,
                grad_step,
                value,
                args,
                &mut self.derivatives,
            );
            snd_derivatives
                .column_mut(i)
                .iter_mut()
                .zip(self.derivatives.iter().zip(derivatives))
                .for_each(|(dd, (d_perturbed, d))| *dd = (*d_perturbed - *d) / step);
            self.point[i] = x;
        }
    }
}

/// Return the estimated second-derivatives of `obj_func` at `point`.
///
/// See [`HessianEstimator::estimate_into`].
pub fn hessian<A, X, F>(
    obj_func: &F,
    point: &[A],
    grad_step: GradStep<A>,
    derivatives: &[A],
    args: &X,
) -> Array2<A>
where
    A: Float,
    X: ?Sized,
    F: Fn(&[A], &X) -> A,
{
    let mut snd_derivatives = Array2::zeros((point.len(), point.len()));
    HessianEstimator::new(point.len()).estimate_into(
        obj_func,
        point,
        grad_step,
        derivatives,
        args,
        &mut snd_derivatives,
    );
    snd_derivatives
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use proptest::prelude::*;
    use test_strategy::proptest;

    use crate::gradient;

    use super::*;

    fn quadratic(point: &[f64], _: &()) -> f64 {
        point[0].powi(2) + 3.0 * point[0] * point[1] + 2.0 * point[1].powi(2)
    }

    #[test]
    fn hessian_should_approximate_second_derivatives_of_quadratic() {
        let point = [1.0, 2.0];
        let grad_step = GradStep::new(1e-4).unwrap();
        let derivatives = gradient(&quadratic, &point, grad_step, quadratic(&point, &()), &());
        let snd_derivatives = hessian(&quadratic, &point, grad_step, &derivatives, &());
        for (x, y) in snd_derivatives.iter().zip(&array![[2.0, 3.0], [3.0, 4.0]]) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-3);
        }
    }

    #[test]
    fn hessian_should_evaluate_n_plus_n_squared_times() {
        let evaluations = Cell::new(0);
        let obj_func = |point: &[f64], _: &()| {
            evaluations.set(evaluations.get() + 1);
            point.iter().map(|x| x.powi(2)).sum::<f64>()
        };
        let point = [1.0, 2.0, 3.0];
        let derivatives = [2.0, 4.0, 6.0];
        hessian(&obj_func, &point, GradStep::default(), &derivatives, &());
        assert_eq!(evaluations.get(), 3 + 3 * 3);
    }

    #[test]
    fn hessian_estimator_should_accept_points_of_its_len() {
        assert_eq!(HessianEstimator::<f64>::new(2).len(), 2);
        assert!(!HessianEstimator::<f64>::new(2).is_empty());
        assert!(HessianEstimator::<f64>::new(0).is_empty());
    }

    #[proptest]
    fn hessian_should_be_square_with_length_of_point(
        #[strategy(proptest::collection::vec(-10.0..10.0, 0..6))] point: Vec<f64>,
    ) {
        let obj_func = |point: &[f64], _: &()| point.iter().map(|x| x.powi(2)).sum::<f64>();
        let derivatives = gradient(
            &obj_func,
            &point,
            GradStep::default(),
            obj_func(&point, &()),
            &(),
        );
        let snd_derivatives = hessian(&obj_func, &point, GradStep::default(), &derivatives, &());
        prop_assert_eq!(snd_derivatives.dim(), (point.len(), point.len()));
        prop_assert!(snd_derivatives.iter().all(|x| x.is_finite()));
    }
}
