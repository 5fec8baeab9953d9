//! Private Module

use super::{finish, validate_stop, Minimum};
use crate::error::{Error, Result};
use crate::linalg;
use crate::linesearch::LineSearch;
use crate::objective::{check_point, gradient_at, hessian_at, Hessian};
use log::{debug, trace};
use ndarray::prelude::*;
use ndarray::NdFloat;

const NAME: &str = "Newton's method";

/// The only dimension [`newton`](fn.newton.html) supports.
pub const NEWTON_DIM: usize = 3;

/// Settings for [`newton`](fn.newton.html)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(default, bound(deserialize = "S: NdFloat + serde::Deserialize<'de>"))
)]
pub struct Newton<S> {
    /// Stop once the gradient norm is below this.
    pub epsilon: S,
    pub max_iter: usize,
    pub line_search: LineSearch<S>,
}

impl<S: NdFloat> Default for Newton<S> {
    fn default() -> Self {
        Newton {
            epsilon: S::from(1e-5).unwrap(),
            max_iter: 100,
            line_search: LineSearch::default(),
        }
    }
}

impl<S: NdFloat> Newton<S> {
    pub fn validate(&self) -> Result<()> {
        validate_stop(self.epsilon)?;
        self.line_search.validate()
    }
}

/// Damped Newton's method for 3-dimensional problems
///
/// Algorithm
/// ---------
/// ```math
/// \begin{aligned}
/// g_i &= \nabla f(x_i) \\
/// d_i &= \begin{cases}
///     -\left(\nabla^2 f(x_i)\right)^{-1} g_i & \text{if the Hessian is invertible and } \langle g_i, d_i \rangle < 0 \\
///     -g_i & \text{otherwise}
/// \end{cases} \\
/// \alpha_i &\in \mathrm{arg}\!\min_{\alpha \in [0, \alpha_{max}]} f(x_i + \alpha d_i) \\
/// x_{i+1} &= x_i + \alpha_i d_i
/// \end{aligned}
/// ```
///
/// The Hessian is inverted in closed form, which is why only 3-D points are
/// accepted. A singular Hessian or one that is not positive definite along
/// the Newton direction falls back to a steepest descent step for that
/// iteration.
///
/// Parameters
/// ----------
/// - __objective:__ value, gradient and Hessian oracle
/// - __x0:__        initial guess of length 3 (not modified)
/// - __config:__    tolerances and line search bracket
/// - __callback:__  User-defined function to be evaluated with two arguments (x,iter).
///                   It is evaluated at (x0,0) and then after each iteration.
///                   If it returns True, the function terminates early.
pub fn newton<S, F>(
    objective: &F,
    x0: ArrayView1<S>,
    config: &Newton<S>,
    mut callback: impl FnMut(ArrayView1<S>, usize) -> bool,
) -> Result<Minimum<S>>
where
    S: NdFloat,
    F: Hessian<S> + ?Sized,
{
    config.validate()?;
    if x0.len() != NEWTON_DIM {
        return Err(Error::UnsupportedDimension {
            solver: NAME,
            expected: NEWTON_DIM,
            found: x0.len(),
        });
    }
    check_point(objective, x0, "newton")?;

    let mut x = x0.to_owned();
    let mut iter = 0;

    let mut stopped = callback(x.view(), 0);
    while !stopped && iter < config.max_iter {
        let grad = gradient_at(objective, x.view())?;
        let grad_norm = linalg::norm(&grad);
        if grad_norm < config.epsilon {
            return Ok(finish(NAME, x, iter, grad_norm, config.epsilon, false));
        }

        let hess = hessian_at(objective, x.view())?;
        let antigrad = linalg::scale(-S::one(), &grad);
        let direction = match linalg::inverse_3x3(&hess)? {
            None => {
                debug!("Singular Hessian, doing steepest descent. (i: {})", iter);
                antigrad
            }
            Some(hess_inv) => {
                let newton_dir = linalg::scale(-S::one(), &linalg::mat_vec(&hess_inv, &grad)?);
                if linalg::dot(&grad, &newton_dir)? >= S::zero() {
                    debug!("Newton step goes uphill, doing steepest descent. (i: {})", iter);
                    antigrad
                } else {
                    newton_dir
                }
            }
        };

        let alpha = config.line_search.search(objective, x.view(), direction.view())?;
        trace!("{}: i: {:>4}  |g|: {:<13e}  a: {:<13e}", NAME, iter, grad_norm, alpha);
        x = linalg::step(&x, alpha, &direction)?;
        iter += 1;
        stopped = callback(x.view(), iter);
    }

    let grad_norm = linalg::norm(&gradient_at(objective, x.view())?);
    Ok(finish(NAME, x, iter, grad_norm, config.epsilon, stopped))
}
