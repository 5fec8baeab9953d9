//! Descent Methods for Smooth Unconstrained Minimization
//!
//! For minimizing a twice-differentiable objective $`f`$ from a starting
//! point $`x_0`$. Every method here repeats the same outer loop
//! ```math
//! \begin{aligned}
//! g_i &= \nabla f(x_i) \\
//! d_i &= \mathrm{direction}(g_i, \ldots) \\
//! \alpha_i &\in \mathrm{arg}\!\min_{\alpha \in [0, \alpha_{max}]} f(x_i + \alpha d_i) \\
//! x_{i+1} &= x_i + \alpha_i d_i
//! \end{aligned}
//! ```
//! until $`\|g_i\|_2 < \epsilon`$ or the iteration budget runs out,
//! and they differ only in how the direction is chosen:
//! - [conjugate gradient](fn.conjugate_gradient.html) (Fletcher-Reeves or Polak-Ribiere)
//! - [damped Newton](fn.newton.html) with the exact Hessian (3-D only)
//! - [symmetric rank-1 quasi-Newton](fn.quasi_newton_sr1.html)
//!
//! The step length comes from a
//! [golden section search](../linesearch/index.html) on a fixed bracket.
//!
//! Running out of iterations is not an error. The last iterate is returned
//! in a [`Minimum`](struct.Minimum.html) and its
//! [`Termination`](enum.Termination.html) says why the loop stopped.

mod cg;
pub use cg::*;
mod newton;
pub use newton::*;
mod sr1;
pub use sr1::*;

pub use crate::linesearch::LineSearch;

use crate::error::{Error, Result};
use log::{info, warn};
use ndarray::prelude::*;
use ndarray::NdFloat;

/// Do nothing function for optional user callback (returns false)
#[allow(clippy::needless_pass_by_value)]
pub fn nop<T, D>(_x: ArrayView<T, D>, _itr: usize) -> bool {
    false
}

/// Why a solver stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The gradient norm dropped below `epsilon`.
    Converged,
    /// `max_iter` iterations were used up first.
    MaxIterations,
    /// The user callback asked to stop.
    Callback,
}

/// Final iterate of a solver run
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum<S> {
    pub x: Array1<S>,
    /// Number of completed iterations, at most `max_iter`.
    pub iterations: usize,
    /// Norm of the gradient at `x`, as last computed by the solver.
    pub grad_norm: S,
    pub termination: Termination,
}

impl<S> Minimum<S> {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

pub(crate) fn validate_stop<S: NdFloat>(epsilon: S) -> Result<()> {
    if epsilon.is_finite() && epsilon >= S::zero() {
        Ok(())
    } else {
        Err(Error::InvalidConfig {
            name: "epsilon",
            value: epsilon.to_f64().unwrap_or(std::f64::NAN),
            reason: "must be non-negative and finite",
        })
    }
}

/// Wrap up a run whose loop has ended, logging the outcome.
///
/// `grad_norm` must be the gradient norm at `x`. A run that used its whole
/// budget still counts as converged if that final point is good enough.
pub(crate) fn finish<S: NdFloat>(
    method: &str,
    x: Array1<S>,
    iterations: usize,
    grad_norm: S,
    epsilon: S,
    stopped_by_callback: bool,
) -> Minimum<S> {
    let termination = if grad_norm < epsilon {
        info!(
            "{} converged. Iterations: {}, Grad Norm: {:e}",
            method, iterations, grad_norm
        );
        Termination::Converged
    } else if stopped_by_callback {
        info!("{} stopped by callback after {} iterations", method, iterations);
        Termination::Callback
    } else {
        warn!(
            "{} reached the maximum number of iterations ({}). Grad Norm: {:e}",
            method, iterations, grad_norm
        );
        Termination::MaxIterations
    };
    Minimum {
        x,
        iterations,
        grad_norm,
        termination,
    }
}

#[allow(non_snake_case)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::{Hessian, Objective};
    use crate::test_functions::{ExpCoupled, Quartic};
    use approx::assert_abs_diff_eq;

    fn init_logger() {
        let _ = env_logger::try_init();
    }

    fn solve_all<F: Hessian<f64>>(
        f: &F,
        x0: ArrayView1<f64>,
        line_search: LineSearch<f64>,
    ) -> Vec<(&'static str, Minimum<f64>)> {
        let fr = ConjugateGradient {
            line_search,
            method: Method::FletcherReeves,
            ..ConjugateGradient::default()
        }
        .with_restart_interval(15);
        let pr = ConjugateGradient {
            method: Method::PolakRibiere,
            ..fr
        };
        let newton_config = Newton {
            line_search,
            max_iter: 1000,
            ..Newton::default()
        };
        let sr1_config = QuasiNewton {
            line_search,
            max_iter: 1000,
            ..QuasiNewton::default()
        }
        .with_reset_interval(15);

        vec![
            ("FR", conjugate_gradient(f, x0, &fr, nop).unwrap()),
            ("PR", conjugate_gradient(f, x0, &pr, nop).unwrap()),
            ("Newton", newton(f, x0, &newton_config, nop).unwrap()),
            ("SR1", quasi_newton_sr1(f, x0, &sr1_config, nop).unwrap()),
        ]
    }

    #[test]
    fn quartic_all_methods_agree() {
        init_logger();
        let f = Quartic;
        let x0 = array![0., 0., 0.];
        let results = solve_all(&f, x0.view(), LineSearch::new(1., 1e-6));

        let reference = f.value(results[2].1.x.view()).unwrap();
        for (name, min) in &results {
            let value = f.value(min.x.view()).unwrap();
            println!("{}: x = {}, f = {}, iterations = {}", name, min.x, value, min.iterations);
            assert!(min.iterations <= 1000);
            assert_abs_diff_eq!(value, reference, epsilon = 1e-3);
            if *name != "SR1" {
                assert!(min.converged(), "{} did not converge", name);
                let grad = f.gradient(min.x.view()).unwrap();
                assert!(crate::linalg::norm(&grad) < 1e-5);
            }
        }
        // the minimizer lies in the x3 = 0 plane with x1, x2 < 0
        let x = &results[2].1.x;
        assert!(x[0] < 0. && x[1] < 0.);
        assert_abs_diff_eq!(x[2], 0., epsilon = 1e-4);
    }

    #[test]
    fn exp_coupled_all_methods_agree() {
        init_logger();
        let f = ExpCoupled;
        let x0 = array![0., 0., 0.];
        let results = solve_all(&f, x0.view(), LineSearch::new(1., 1e-7));

        let reference = f.value(results[2].1.x.view()).unwrap();
        for (name, min) in &results {
            let value = f.value(min.x.view()).unwrap();
            println!("{}: x = {}, f = {}, iterations = {}", name, min.x, value, min.iterations);
            assert_abs_diff_eq!(value, reference, epsilon = 1e-3);
        }
        assert!(results[2].1.converged());
    }

    #[test]
    fn rerun_from_minimum_is_stationary() {
        let f = Quartic;
        let x0 = array![0., 0., 0.];
        for (name, min) in solve_all(&f, x0.view(), LineSearch::new(1., 1e-6)) {
            if !min.converged() {
                continue;
            }
            let line_search = LineSearch::new(1., 1e-6);
            let again = match name {
                "FR" | "PR" => {
                    let config = ConjugateGradient {
                        max_iter: 1,
                        line_search,
                        ..ConjugateGradient::default()
                    };
                    conjugate_gradient(&f, min.x.view(), &config, nop).unwrap()
                }
                "Newton" => {
                    let config = Newton {
                        max_iter: 1,
                        line_search,
                        ..Newton::default()
                    };
                    newton(&f, min.x.view(), &config, nop).unwrap()
                }
                _ => {
                    let config = QuasiNewton {
                        max_iter: 1,
                        line_search,
                        ..QuasiNewton::default()
                    };
                    quasi_newton_sr1(&f, min.x.view(), &config, nop).unwrap()
                }
            };
            assert!(again.converged());
            assert_abs_diff_eq!(again.x, min.x, epsilon = 1e-6);
        }
    }

    #[test]
    fn invalid_epsilon() {
        assert!(validate_stop(0.).is_ok());
        assert!(validate_stop(1e-5).is_ok());
        assert!(validate_stop(-1.).is_err());
        assert!(validate_stop(std::f64::NAN).is_err());
    }

    #[test]
    fn finish_reports_outcome() {
        let x = array![1., 2.];
        let min = finish("test", x.clone(), 3, 1e-8, 1e-5, false);
        assert_eq!(min.termination, Termination::Converged);
        let min = finish("test", x.clone(), 3, 1e-2, 1e-5, false);
        assert_eq!(min.termination, Termination::MaxIterations);
        assert!(!min.converged());
        let min = finish("test", x, 3, 1e-2, 1e-5, true);
        assert_eq!(min.termination, Termination::Callback);
    }
}
