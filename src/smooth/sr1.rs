//! Private Module

use super::{finish, validate_stop, Minimum};
use crate::error::Result;
use crate::linalg;
use crate::linesearch::LineSearch;
use crate::linop::{InverseHessian, LinearOperator, Sr1Update};
use crate::objective::{check_point, gradient_at, Objective};
use log::{debug, trace};
use ndarray::prelude::*;
use ndarray::NdFloat;
use ndarray_linalg::Scalar;

const NAME: &str = "Quasi-Newton (SR1)";

/// Settings for [`quasi_newton_sr1`](fn.quasi_newton_sr1.html)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(default, bound(deserialize = "S: NdFloat + serde::Deserialize<'de>"))
)]
pub struct QuasiNewton<S> {
    /// Stop once the gradient norm is below this.
    pub epsilon: S,
    pub max_iter: usize,
    pub line_search: LineSearch<S>,
    /// Every this many iterations the inverse Hessian approximation goes
    /// back to the identity. `0` never resets.
    pub reset_interval: usize,
}

impl<S: NdFloat> Default for QuasiNewton<S> {
    fn default() -> Self {
        QuasiNewton {
            epsilon: S::from(1e-5).unwrap(),
            max_iter: 500,
            line_search: LineSearch::default(),
            reset_interval: 0,
        }
    }
}

impl<S: NdFloat> QuasiNewton<S> {
    pub fn with_reset_interval(self, reset_interval: usize) -> Self {
        QuasiNewton {
            reset_interval,
            ..self
        }
    }

    /// A reset interval of `5 n` for an `n`-dimensional problem.
    pub fn reset_for_dim(self, n: usize) -> Self {
        self.with_reset_interval(5 * n)
    }

    pub fn validate(&self) -> Result<()> {
        validate_stop(self.epsilon)?;
        self.line_search.validate()
    }
}

/// Quasi-Newton method with the symmetric rank-1 update
///
/// Algorithm
/// ---------
/// ```math
/// \begin{aligned}
/// H_0 &= I \\
/// d_i &= -H_i g_i \\
/// \alpha_i &\in \mathrm{arg}\!\min_{\alpha \in [0, \alpha_{max}]} f(x_i + \alpha d_i) \\
/// \delta_i &= \alpha_i d_i, \quad x_{i+1} = x_i + \delta_i \\
/// \gamma_i &= g_{i+1} - g_i \\
/// H_{i+1} &= H_i + \frac{(\delta_i - H_i\gamma_i)(\delta_i - H_i\gamma_i)^T}{\langle \delta_i - H_i\gamma_i, \gamma_i \rangle}
/// \end{aligned}
/// ```
///
/// When the denominator is at most
/// [`SR1_SKIP`](../linop/constant.SR1_SKIP.html) in magnitude the update is
/// replaced by a reset to $`H = I`$, see
/// [`InverseHessian::sr1_update`](../linop/struct.InverseHessian.html#method.sr1_update).
/// Unlike BFGS, SR1 does not keep $`H`$ positive definite, so $`d_i`$ is
/// not always a descent direction. The line search then has nothing to
/// gain on $`[0, \alpha_{max}]`$ and returns a step close to zero, and the
/// periodic `reset_interval` is what gets the iteration moving again.
///
/// Parameters
/// ----------
/// - __objective:__ value and gradient oracle
/// - __x0:__        initial guess (not modified)
/// - __config:__    tolerances, line search bracket and reset interval
/// - __callback:__  User-defined function to be evaluated with two arguments (x,iter).
///                   It is evaluated at (x0,0) and then after each iteration.
///                   If it returns True, the function terminates early.
pub fn quasi_newton_sr1<S, F>(
    objective: &F,
    x0: ArrayView1<S>,
    config: &QuasiNewton<S>,
    mut callback: impl FnMut(ArrayView1<S>, usize) -> bool,
) -> Result<Minimum<S>>
where
    S: NdFloat + Scalar,
    F: Objective<S> + ?Sized,
{
    config.validate()?;
    check_point(objective, x0, "quasi-newton")?;

    // loop variables (pass from one iter to next)
    let mut x = x0.to_owned();
    let mut grad = gradient_at(objective, x.view())?;
    let mut h = InverseHessian::identity(x.len());
    let mut iter = 0;

    let mut stopped = callback(x.view(), 0);
    while !stopped && iter < config.max_iter {
        let grad_norm = linalg::norm(&grad);
        if grad_norm < config.epsilon {
            break;
        }
        if config.reset_interval > 0 && iter > 0 && iter % config.reset_interval == 0 {
            debug!("Resetting inverse Hessian approximation. (i: {})", iter);
            h.reset();
        }

        let direction = linalg::scale(-S::one(), &h.apply(&grad));
        let alpha = config.line_search.search(objective, x.view(), direction.view())?;
        trace!("{}: i: {:>4}  |g|: {:<13e}  a: {:<13e}", NAME, iter, grad_norm, alpha);

        let delta = linalg::scale(alpha, &direction);
        x = linalg::add(&x, &delta)?;
        let grad_next = gradient_at(objective, x.view())?;
        let gamma = linalg::sub(&grad_next, &grad)?;
        if h.sr1_update(&delta, &gamma)? == Sr1Update::Reset {
            debug!(
                "SR1 denominator below {:e}, resetting to identity. (i: {})",
                crate::linop::SR1_SKIP,
                iter
            );
        }

        grad = grad_next;
        iter += 1;
        stopped = callback(x.view(), iter);
    }

    let grad_norm = linalg::norm(&grad);
    Ok(finish(NAME, x, iter, grad_norm, config.epsilon, stopped))
}
