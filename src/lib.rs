#![warn(missing_debug_implementations)]
#![warn(missing_docs)]

//! Calibrate parameters of numerical models
//! by minimizing an objective function
//! with finite-difference Newton-Raphson.
//!
//! The model supplies an objective function,
//! an initial guess,
//! and auxiliary arguments
//! passed unchanged to every evaluation.
//! Calibration returns the point found,
//! how the optimizer stopped,
//! and a diagnosis of the result.
//! What to do with the point,
//! such as writing it back into the model,
//! is left to the caller.
//!
//! # Examples
//!
//! ```
//! use optimal_calibrate::calibrate;
//!
//! struct Observations {
//!     xs: Vec<f64>,
//!     ys: Vec<f64>,
//! }
//!
//! // Sum of squared errors of the line `a + b x`.
//! fn sse(point: &[f64], data: &Observations) -> f64 {
//!     data.xs
//!         .iter()
//!         .zip(&data.ys)
//!         .map(|(x, y)| (point[0] + point[1] * x - y).powi(2))
//!         .sum()
//! }
//!
//! let data = Observations {
//!     xs: vec![0.0, 1.0, 2.0, 3.0],
//!     ys: vec![1.0, 3.0, 5.0, 7.0],
//! };
//! let calibration = calibrate(sse, &[0.0, 0.0], &data);
//! assert!(calibration.diagnosis.check().is_ok());
//! println!("{:?}", calibration.optimum.point);
//! ```
//!
//! For more control over configuration
//! and introspection of the optimization process,
//! see [`newton`].

use std::fmt::{Debug, Display};

use log::warn;
use num_traits::{AsPrimitive, Float};
use optimal_newton::{diagnose, Diagnosis, NewtonRaphson, Optimum};

pub use optimal_findiff as findiff;
pub use optimal_newton as newton;

/// Types and traits for calibrating.
pub mod prelude {
    pub use optimal_newton::prelude::*;
    pub use optimal_newton::{
        FunTolerance, GradStep, MaxIter, NewtonRaphson, NewtonRaphsonBuilder, PointTolerance,
        Termination,
    };

    pub use crate::{calibrate, calibrate_with, Calibration};
}

/// Result of a calibration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Calibration<A> {
    /// Point found and how the optimizer stopped.
    pub optimum: Optimum<A>,
    /// Checks of `optimum`.
    pub diagnosis: Diagnosis<A>,
}

/// Calibrate with the default configuration.
///
/// See [`calibrate_with`].
pub fn calibrate<A, X, F>(obj_func: F, initial_point: &[A], args: &X) -> Calibration<A>
where
    A: 'static + Debug + Display + Float,
    f64: AsPrimitive<A>,
    X: ?Sized,
    F: Fn(&[A], &X) -> A,
{
    calibrate_with(&NewtonRaphson::default(), obj_func, initial_point, args)
}

/// Minimize `obj_func` from `initial_point`
/// and diagnose the result.
///
/// `args` is passed unchanged
/// to every evaluation of `obj_func`.
/// A suspect result is logged
/// and returned all the same.
pub fn calibrate_with<A, X, F>(
    config: &NewtonRaphson<A>,
    obj_func: F,
    initial_point: &[A],
    args: &X,
) -> Calibration<A>
where
    A: Debug + Display + Float,
    X: ?Sized,
    F: Fn(&[A], &X) -> A,
{
    let optimum = config
        .clone()
        .for_(&obj_func)
        .with_point(initial_point.to_vec())
        .start(args)
        .run();
    let diagnosis = diagnose(&obj_func, &optimum, config.grad_step, args);
    if let Err(e) = diagnosis.check() {
        warn!("calibration may be wrong: {}", e);
    }
    Calibration { optimum, diagnosis }
}
