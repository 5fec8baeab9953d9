//! The `ndarray-minimize` crate finds local minimizers of smooth,
//! unconstrained objectives over `ndarray` vectors.
//!
//! Three descent methods are provided in [`smooth`](smooth/index.html):
//! - Conjugate Gradient (Fletcher-Reeves and Polak-Ribiere)
//! - Damped Newton's method (3-D, exact Hessian)
//! - Symmetric rank-1 quasi-Newton
//!
//! All of them take their step length from a golden section
//! [line search](linesearch/index.html) and talk to the problem only
//! through the [`Objective`](objective/trait.Objective.html) and
//! [`Hessian`](objective/trait.Hessian.html) traits, so any function with
//! analytic derivatives can be plugged in. A few such functions live in
//! [`test_functions`](test_functions/index.html).
//!
//! Solvers log through the `log` facade: one `trace!` line per iteration,
//! `debug!` when a safeguard kicks in (restarts, resets, steepest descent
//! fallbacks), and the outcome at `info!` or `warn!`.

#![cfg_attr(all(rustc_nightly, test), feature(test))]
#[cfg(all(rustc_nightly, test))]
extern crate test;

#[cfg(test)]
extern crate intel_mkl_src;

pub mod error;
pub mod linalg;
pub mod linesearch;
pub mod linop;
pub mod objective;
pub mod smooth;
pub mod test_functions;

pub use error::{Error, Result};
pub use objective::{Hessian, Objective};
