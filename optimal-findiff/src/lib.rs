#![warn(missing_debug_implementations)]
#![warn(missing_docs)]

//! Finite-difference derivatives
//! of scalar objective functions.
//!
//! Derivatives are estimated by forward differences,
//! one objective evaluation per coordinate.
//! Second-derivatives are estimated
//! by differencing gradients
//! at perturbed points,
//! so a Hessian costs `n + n^2` evaluations
//! for a point of length `n`.
//!
//! Objective functions take a point
//! and a reference to auxiliary arguments,
//! forwarded unchanged to every evaluation.
//!
//! # Examples
//!
//! ```
//! use optimal_findiff::{gradient, hessian, GradStep};
//!
//! let obj_func = |point: &[f64], c: &f64| point.iter().map(|x| (x - c).powi(2)).sum::<f64>();
//! let point = [1.0, 2.0];
//! let grad_step = GradStep::new(1e-5).unwrap();
//!
//! let value = obj_func(&point, &3.0);
//! let derivatives = gradient(&obj_func, &point, grad_step, value, &3.0);
//! let snd_derivatives = hessian(&obj_func, &point, grad_step, &derivatives, &3.0);
//!
//! println!("{:?}\n{:?}", derivatives, snd_derivatives);
//! ```

mod gradient;
mod hessian;
mod types;

use num_traits::Float;

pub use self::{gradient::*, hessian::*, types::*};

/// Return the forward-difference step
/// for a coordinate with value `x`,
/// `max(h * x, h)`,
/// where `h` is the base step.
///
/// The step scales with positive coordinates,
/// but never falls below `h`,
/// so coordinates near zero
/// and negative coordinates
/// all step by `h`.
pub fn step_size<A>(grad_step: GradStep<A>, x: A) -> A
where
    A: Float,
{
    let h = grad_step.into_inner();
    // `max` returns `h` if the product is NaN.
    (h * x).max(h)
}
