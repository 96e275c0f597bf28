use std::{fmt::Debug, ops::RangeInclusive};

use derive_builder::Builder;
use derive_getters::{Dissolve, Getters};
use log::{debug, trace};
use ndarray::Array2;
use num_traits::{AsPrimitive, Float};
use optimal_findiff::{GradientEstimator, HessianEstimator};
use rand::{
    distributions::{uniform::SampleUniform, Uniform},
    prelude::*,
};
use streaming_iterator::StreamingIterator;

use crate::{linalg::Lu, low_level::*, types::*};

/// Newton-Raphson independent of problem.
#[derive(Clone, Debug, PartialEq, PartialOrd, Builder)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[builder(build_fn(skip))]
pub struct NewtonRaphson<A> {
    /// See [`MaxIter`].
    #[builder(default)]
    pub max_iter: MaxIter,
    /// See [`GradStep`].
    #[builder(default)]
    pub grad_step: GradStep<A>,
    /// See [`FunTolerance`].
    #[builder(default)]
    pub tol_fun: FunTolerance<A>,
    /// See [`PointTolerance`].
    #[builder(default)]
    pub tol_x: PointTolerance<A>,
}

impl<A> Default for NewtonRaphson<A>
where
    A: 'static + Copy,
    f64: AsPrimitive<A>,
{
    fn default() -> Self {
        NewtonRaphsonBuilder::default().build()
    }
}

impl<A> NewtonRaphson<A> {
    /// Prepare Newton-Raphson for a specific problem.
    ///
    /// - `obj_func`: objective function to minimize,
    ///   taking a point
    ///   and auxiliary arguments
    pub fn for_<F>(self, obj_func: F) -> NewtonRaphsonFor<A, F> {
        NewtonRaphsonFor {
            agnostic: self,
            obj_func,
        }
    }

    /// Return a point that attempts to minimize `obj_func`
    /// starting from `initial_point`.
    ///
    /// `args` is passed unchanged
    /// to every evaluation of `obj_func`.
    pub fn optimize<F, X>(&self, obj_func: F, initial_point: &[A], args: &X) -> Vec<A>
    where
        A: Debug + Float,
        X: ?Sized,
        F: Fn(&[A], &X) -> A,
    {
        self.clone()
            .for_(obj_func)
            .with_point(initial_point.to_vec())
            .argmin(args)
    }
}

impl<A> NewtonRaphsonBuilder<A> {
    /// Prepare Newton-Raphson for a specific problem.
    ///
    /// - `obj_func`: objective function to minimize,
    ///   taking a point
    ///   and auxiliary arguments
    pub fn for_<F>(&mut self, obj_func: F) -> NewtonRaphsonFor<A, F>
    where
        A: 'static + Copy,
        f64: AsPrimitive<A>,
    {
        self.build().for_(obj_func)
    }

    /// Builds a new [`NewtonRaphson`],
    /// using defaults for unset fields.
    pub fn build(&self) -> NewtonRaphson<A>
    where
        A: 'static + Copy,
        f64: AsPrimitive<A>,
    {
        NewtonRaphson {
            max_iter: self.max_iter.unwrap_or_default(),
            grad_step: self.grad_step.unwrap_or_default(),
            tol_fun: self.tol_fun.unwrap_or_default(),
            tol_x: self.tol_x.unwrap_or_default(),
        }
    }
}

/// Newton-Raphson for a specific problem.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewtonRaphsonFor<A, F> {
    /// Problem-agnostic variables.
    pub agnostic: NewtonRaphson<A>,
    /// Objective function to minimize.
    pub obj_func: F,
}

impl<A, F> NewtonRaphsonFor<A, F> {
    /// Prepare Newton-Raphson with a random point.
    pub fn with_random_point(
        self,
        initial_bounds: impl IntoIterator<Item = RangeInclusive<A>>,
    ) -> NewtonRaphsonWith<A, F>
    where
        A: SampleUniform,
    {
        self.with_random_point_using(initial_bounds, SmallRng::from_entropy())
    }

    /// Prepare Newton-Raphson with a random point
    /// using a specific RNG.
    pub fn with_random_point_using<R>(
        self,
        initial_bounds: impl IntoIterator<Item = RangeInclusive<A>>,
        mut rng: R,
    ) -> NewtonRaphsonWith<A, F>
    where
        A: SampleUniform,
        R: Rng,
    {
        self.with_point(
            initial_bounds
                .into_iter()
                .map(|range| {
                    let (start, end) = range.into_inner();
                    Uniform::new_inclusive(start, end).sample(&mut rng)
                })
                .collect(),
        )
    }

    /// Prepare Newton-Raphson with a specific point.
    pub fn with_point(self, initial_point: Vec<A>) -> NewtonRaphsonWith<A, F> {
        NewtonRaphsonWith {
            problem: self,
            initial_point,
        }
    }
}

/// Newton-Raphson with an initial point.
#[derive(Clone, Debug, Dissolve, Getters)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[dissolve(rename = "into_parts")]
pub struct NewtonRaphsonWith<A, F> {
    /// Problem-specific variables.
    pub problem: NewtonRaphsonFor<A, F>,
    /// Initial point to search from.
    pub initial_point: Vec<A>,
}

impl<A, F> NewtonRaphsonWith<A, F> {
    /// Return a point that attempts to minimize the objective function.
    ///
    /// `args` is passed unchanged
    /// to every evaluation of the objective function.
    pub fn argmin<X>(self, args: &X) -> Vec<A>
    where
        A: Debug + Float,
        X: ?Sized,
        F: Fn(&[A], &X) -> A,
    {
        self.start(args).run().point
    }

    /// Return this optimizer running on its problem,
    /// one iteration per step.
    ///
    /// Evaluates the objective function once,
    /// at the initial point.
    pub fn start<X>(self, args: &X) -> Running<'_, A, F, X>
    where
        A: Float,
        X: ?Sized,
        F: Fn(&[A], &X) -> A,
    {
        let len = self.initial_point.len();
        let value = (self.problem.obj_func)(&self.initial_point, args);
        Running {
            problem: self.problem,
            args,
            state: State::Iterating {
                point: self.initial_point,
                value,
                iteration: 0,
            },
            workspace: Workspace::new(len),
        }
    }
}

/// Result of a finished Newton-Raphson optimizer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Optimum<A> {
    /// Last point reached.
    ///
    /// May be non-finite.
    pub point: Vec<A>,
    /// Objective value of `point`.
    pub value: A,
    /// Number of iterations run.
    pub iterations: usize,
    /// Why the optimizer stopped.
    pub termination: Termination,
}

/// A running Newton-Raphson optimizer.
///
/// Each step runs one iteration,
/// until the optimizer terminates.
/// The step after termination exhausts the iterator.
#[derive(Clone, Debug)]
pub struct Running<'a, A, F, X: ?Sized> {
    problem: NewtonRaphsonFor<A, F>,
    args: &'a X,
    state: State<A>,
    workspace: Workspace<A>,
}

#[derive(Clone, Debug)]
enum State<A> {
    Iterating {
        point: Vec<A>,
        value: A,
        iteration: usize,
    },
    Finished(Optimum<A>),
    Exhausted(Optimum<A>),
}

#[derive(Clone, Debug)]
struct Workspace<A> {
    derivatives: Vec<A>,
    snd_derivatives: Array2<A>,
    gradient: GradientEstimator<A>,
    hessian: HessianEstimator<A>,
}

impl<A> Workspace<A>
where
    A: Float,
{
    fn new(len: usize) -> Self {
        Self {
            derivatives: vec![A::zero(); len],
            snd_derivatives: Array2::zeros((len, len)),
            gradient: GradientEstimator::new(len),
            hessian: HessianEstimator::new(len),
        }
    }
}

impl<'a, A, F, X> Running<'a, A, F, X>
where
    X: ?Sized,
{
    /// Return optimizer configuration.
    pub fn config(&self) -> &NewtonRaphson<A> {
        &self.problem.agnostic
    }

    /// Return auxiliary arguments
    /// passed to the objective function.
    pub fn args(&self) -> &'a X {
        self.args
    }

    /// Return the point the next iteration starts from,
    /// or the final point if finished.
    ///
    /// Not necessarily the best point evaluated.
    pub fn best_point(&self) -> &[A] {
        match &self.state {
            State::Iterating { point, .. } => point,
            State::Finished(x) | State::Exhausted(x) => &x.point,
        }
    }

    /// Return objective value of [`Self::best_point`].
    pub fn best_point_value(&self) -> A
    where
        A: Copy,
    {
        match &self.state {
            State::Iterating { value, .. } => *value,
            State::Finished(x) | State::Exhausted(x) => x.value,
        }
    }

    /// Return number of iterations run.
    pub fn iteration(&self) -> usize {
        match &self.state {
            State::Iterating { iteration, .. } => *iteration,
            State::Finished(x) | State::Exhausted(x) => x.iterations,
        }
    }

    /// Return why the optimizer stopped,
    /// if it has.
    pub fn termination(&self) -> Option<Termination> {
        match &self.state {
            State::Iterating { .. } => None,
            State::Finished(x) | State::Exhausted(x) => Some(x.termination),
        }
    }

    /// Run until termination
    /// and return the result.
    pub fn run(mut self) -> Optimum<A>
    where
        A: Debug + Float,
        F: Fn(&[A], &X) -> A,
    {
        loop {
            match self.state {
                State::Iterating { .. } => self.advance(),
                State::Finished(x) | State::Exhausted(x) => return x,
            }
        }
    }
}

impl<'a, A, F, X> StreamingIterator for Running<'a, A, F, X>
where
    A: Debug + Float,
    X: ?Sized,
    F: Fn(&[A], &X) -> A,
{
    type Item = Self;

    fn advance(&mut self) {
        replace_with::replace_with_or_abort(&mut self.state, |state| match state {
            State::Iterating {
                point,
                value,
                iteration,
            } => iterate(
                &self.problem.agnostic,
                &self.problem.obj_func,
                self.args,
                &mut self.workspace,
                point,
                value,
                iteration,
            ),
            State::Finished(x) => State::Exhausted(x),
            State::Exhausted(x) => State::Exhausted(x),
        });
    }

    fn get(&self) -> Option<&Self::Item> {
        match self.state {
            State::Exhausted(_) => None,
            _ => Some(self),
        }
    }
}

fn iterate<A, F, X>(
    config: &NewtonRaphson<A>,
    obj_func: &F,
    args: &X,
    workspace: &mut Workspace<A>,
    point: Vec<A>,
    value: A,
    iteration: usize,
) -> State<A>
where
    A: Debug + Float,
    X: ?Sized,
    F: Fn(&[A], &X) -> A,
{
    let Workspace {
        derivatives,
        snd_derivatives,
        gradient,
        hessian,
    } = workspace;
    gradient.estimate_into(obj_func, &point, config.grad_step, value, args, derivatives);
    hessian.estimate_into(
        obj_func,
        &point,
        config.grad_step,
        derivatives,
        args,
        snd_derivatives,
    );

    let lu = Lu::factor(snd_derivatives.clone());
    let determinant = lu.determinant();
    let candidate = descend(&point, &newton_direction(&lu, determinant, derivatives));
    let candidate_value = obj_func(&candidate, args);
    trace!(
        "iteration {}: determinant {:?}, value {:?} -> {:?}, point {:?}",
        iteration,
        determinant,
        value,
        candidate_value,
        candidate
    );

    if let Some(termination) = converged(
        config.tol_fun,
        config.tol_x,
        config.max_iter,
        iteration,
        value,
        candidate_value,
        &point,
        &candidate,
    ) {
        debug!(
            "stopped after {} iterations: {}",
            iteration + 1,
            termination
        );
        return State::Finished(Optimum {
            point: candidate,
            value: candidate_value,
            iterations: iteration + 1,
            termination,
        });
    }

    // The step is kept even if it is worse,
    // unless the midpoint is better than it.
    let (point, value) = if candidate_value >= value {
        let mid = midpoint(&point, &candidate);
        let mid_value = obj_func(&mid, args);
        if mid_value < candidate_value {
            debug!(
                "iteration {}: midpoint accepted, value {:?}",
                iteration, mid_value
            );
            (mid, mid_value)
        } else {
            debug!(
                "iteration {}: midpoint rejected, value {:?}",
                iteration, mid_value
            );
            (candidate, candidate_value)
        }
    } else {
        (candidate, candidate_value)
    };
    State::Iterating {
        point,
        value,
        iteration: iteration + 1,
    }
}
