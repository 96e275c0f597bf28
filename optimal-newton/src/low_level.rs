//! Functions making up a Newton-Raphson iteration.
//!
//! These functions validate nothing.
//! NaN and infinite inputs
//! propagate into their outputs.

use num_traits::Float;

use crate::{
    linalg::Lu,
    types::{FunTolerance, MaxIter, PointTolerance, Termination},
};

/// Return `-1`, `0`, or `1`
/// matching the sign of `x`,
/// or NaN if `x` is NaN.
///
/// Unlike [`Float::signum`],
/// zero has sign zero.
pub fn sign<A>(x: A) -> A
where
    A: Float,
{
    if x.is_nan() {
        A::nan()
    } else if x > A::zero() {
        A::one()
    } else if x < A::zero() {
        -A::one()
    } else {
        A::zero()
    }
}

/// Return the Newton step-direction,
/// `-sign(determinant) * H^-1 g`.
///
/// The step flips when the determinant is negative
/// and vanishes when the determinant is zero.
///
/// - `lu`: factored Hessian
/// - `determinant`: determinant of the Hessian
/// - `derivatives`: gradient
pub fn newton_direction<A>(lu: &Lu<A>, determinant: A, derivatives: &[A]) -> Vec<A>
where
    A: Float,
{
    let scale = -sign(determinant);
    let mut direction = lu.solve(derivatives);
    direction.iter_mut().for_each(|x| *x = scale * *x);
    direction
}

/// Return `point` moved by `direction`.
pub fn descend<A>(point: &[A], direction: &[A]) -> Vec<A>
where
    A: Float,
{
    debug_assert_eq!(point.len(), direction.len());
    point
        .iter()
        .zip(direction)
        .map(|(x, d)| *x + *d)
        .collect()
}

/// Return the point halfway between `xs` and `ys`.
pub fn midpoint<A>(xs: &[A], ys: &[A]) -> Vec<A>
where
    A: Float,
{
    debug_assert_eq!(xs.len(), ys.len());
    let two = A::one() + A::one();
    xs.iter().zip(ys).map(|(x, y)| (*x + *y) / two).collect()
}

/// Return the largest absolute value in `xs`,
/// or NaN if any value is NaN.
///
/// Returns zero for empty `xs`.
pub fn infinite_norm<A>(xs: impl IntoIterator<Item = A>) -> A
where
    A: Float,
{
    xs.into_iter().fold(A::zero(), |acc, x| {
        if acc.is_nan() || x.is_nan() {
            A::nan()
        } else {
            acc.max(x.abs())
        }
    })
}

/// Return the largest absolute difference
/// between coordinates of `xs` and `ys`,
/// or NaN if any difference is NaN.
pub fn infinite_norm_of_difference<A>(xs: &[A], ys: &[A]) -> A
where
    A: Float,
{
    debug_assert_eq!(xs.len(), ys.len());
    infinite_norm(xs.iter().zip(ys).map(|(x, y)| *x - *y))
}

/// Return why the optimizer should stop
/// after moving from `prev_point` to `point`
/// on 0-based iteration `iteration`,
/// if it should.
///
/// Criteria are checked in order:
/// change in value,
/// change in point,
/// iteration limit.
#[allow(clippy::too_many_arguments)]
pub fn converged<A>(
    tol_fun: FunTolerance<A>,
    tol_x: PointTolerance<A>,
    max_iter: MaxIter,
    iteration: usize,
    prev_value: A,
    value: A,
    prev_point: &[A],
    point: &[A],
) -> Option<Termination>
where
    A: Float,
{
    if (value - prev_value).abs() < tol_fun.into_inner() {
        Some(Termination::FunctionChange)
    } else if infinite_norm_of_difference(point, prev_point) < tol_x.into_inner() {
        Some(Termination::PointChange)
    } else if iteration >= max_iter.into_inner() - 1 {
        Some(Termination::MaxIter)
    } else {
        None
    }
}
