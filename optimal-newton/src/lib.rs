#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![allow(clippy::needless_doctest_main)]

//! Newton-Raphson minimization
//! with finite-difference derivatives.
//!
//! Each iteration estimates the gradient and Hessian
//! at the current point,
//! steps by `-sign(det H) * H^-1 g`,
//! and, if the step did not improve the objective,
//! tries the midpoint of the step once.
//! The step is kept either way.
//!
//! Objective functions take a point
//! and a reference to auxiliary arguments,
//! passed unchanged to every evaluation.
//!
//! # Examples
//!
//! ```
//! use optimal_newton::{MaxIter, NewtonRaphsonBuilder};
//!
//! fn main() {
//!     let optimum = NewtonRaphsonBuilder::default()
//!         .max_iter(MaxIter::new(100).unwrap())
//!         .for_(obj_func)
//!         .with_point(vec![10.0, 10.0])
//!         .start(&[1.0, -2.0][..])
//!         .run();
//!     println!("{:?}", optimum);
//! }
//!
//! fn obj_func(point: &[f64], center: &[f64]) -> f64 {
//!     point
//!         .iter()
//!         .zip(center)
//!         .map(|(x, c)| (x - c).powi(2))
//!         .sum()
//! }
//! ```
//!
//! Iterations can also be observed one at a time:
//!
//! ```
//! use optimal_newton::{prelude::*, NewtonRaphson};
//!
//! let mut running = NewtonRaphson::default()
//!     .for_(|point: &[f64], _: &()| (point[0] - 3.0).powi(2))
//!     .with_point(vec![0.0])
//!     .start(&());
//! while let Some(x) = running.next() {
//!     println!("{}: {:?} {}", x.iteration(), x.best_point(), x.best_point_value());
//! }
//! ```

mod diagnostics;
mod high_level;
pub mod linalg;
pub mod low_level;
pub mod types;

pub use self::{
    diagnostics::{diagnose, Diagnosis, SuspectOptimumError},
    high_level::*,
    types::*,
};

/// Traits needed to step running optimizers.
pub mod prelude {
    pub use streaming_iterator::StreamingIterator;
}
