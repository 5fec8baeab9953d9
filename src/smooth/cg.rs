//! Private Module

use super::{finish, validate_stop, Minimum};
use crate::error::{Error, Result};
use crate::linalg;
use crate::linesearch::LineSearch;
use crate::objective::{check_point, gradient_at, Objective};
use log::{debug, trace};
use ndarray::prelude::*;
use ndarray::NdFloat;
use std::fmt;
use std::str::FromStr;

/// Below this squared gradient norm, `beta` is taken to be zero.
pub const BETA_GUARD: f64 = 1e-12;

/// Choice of update of $`\beta`$ for conjugate gradient
///
/// Both are equivalent on a quadratic problem with exact line searches,
/// but represent different relaxations for non-quadratic problems.
///
/// Parses from (and displays as) the tags `"FR"` and `"PR"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Method {
    /// ```math
    /// \beta_i = \frac{ \langle g_{i+1}, g_{i+1} \rangle}{\langle g_i, g_i \rangle }
    /// ```
    #[cfg_attr(feature = "serde", serde(rename = "FR"))]
    FletcherReeves,

    /// ```math
    /// \beta_i = \max\left(0, \frac{ \langle g_{i+1}, g_{i+1} - g_i \rangle}{\langle g_i, g_i \rangle }\right)
    /// ```
    #[cfg_attr(feature = "serde", serde(rename = "PR"))]
    PolakRibiere,
}

impl Method {
    pub fn tag(self) -> &'static str {
        match self {
            Method::FletcherReeves => "FR",
            Method::PolakRibiere => "PR",
        }
    }

    /// `beta` for the step from gradient `grad` to `grad_next`.
    ///
    /// `grad_norm_sq` and `grad_next_norm_sq` are the squared norms of the two.
    fn beta<S: NdFloat>(
        self,
        grad: &Array1<S>,
        grad_next: &Array1<S>,
        grad_norm_sq: S,
        grad_next_norm_sq: S,
    ) -> Result<S> {
        if grad_norm_sq <= S::from(BETA_GUARD).unwrap() {
            return Ok(S::zero());
        }
        Ok(match self {
            Method::FletcherReeves => grad_next_norm_sq / grad_norm_sq,
            Method::PolakRibiere => {
                let diff = linalg::sub(grad_next, grad)?;
                let beta = linalg::dot(grad_next, &diff)? / grad_norm_sq;
                beta.max(S::zero())
            }
        })
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Method> {
        match s {
            "FR" => Ok(Method::FletcherReeves),
            "PR" => Ok(Method::PolakRibiere),
            _ => Err(Error::UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Settings for [`conjugate_gradient`](fn.conjugate_gradient.html)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(default, bound(deserialize = "S: NdFloat + serde::Deserialize<'de>"))
)]
pub struct ConjugateGradient<S> {
    /// Stop once the gradient norm is below this.
    pub epsilon: S,
    pub max_iter: usize,
    pub line_search: LineSearch<S>,
    pub method: Method,
    /// Every this many iterations the direction is reset to the
    /// antigradient. `0` never restarts.
    pub restart_interval: usize,
}

impl<S: NdFloat> Default for ConjugateGradient<S> {
    fn default() -> Self {
        ConjugateGradient {
            epsilon: S::from(1e-5).unwrap(),
            max_iter: 1000,
            line_search: LineSearch::default(),
            method: Method::FletcherReeves,
            restart_interval: 0,
        }
    }
}

impl<S: NdFloat> ConjugateGradient<S> {
    pub fn with_method(self, method: Method) -> Self {
        ConjugateGradient { method, ..self }
    }

    pub fn with_restart_interval(self, restart_interval: usize) -> Self {
        ConjugateGradient {
            restart_interval,
            ..self
        }
    }

    /// A restart interval of `5 n` for an `n`-dimensional problem.
    pub fn restart_for_dim(self, n: usize) -> Self {
        self.with_restart_interval(5 * n)
    }

    pub fn validate(&self) -> Result<()> {
        validate_stop(self.epsilon)?;
        self.line_search.validate()
    }
}

/// Non-linear Conjugate Gradient with a golden section line search
///
/// Algorithm
/// ---------
/// ```math
/// \begin{aligned}
/// d_0 &= -g_0 \\
/// \alpha_i &\in \mathrm{arg}\!\min_{\alpha \in [0, \alpha_{max}]} f(x_i + \alpha d_i) \\
/// x_{i+1} &= x_i + \alpha_i d_i \\
/// g_{i+1} &= \nabla f(x_{i+1}) \\
/// \beta_i &= \mathrm{beta\_update}(g_{i+1}, g_i) \\
/// d_{i+1} &= -g_{i+1} + \beta_i d_i
/// \end{aligned}
/// ```
/// where the choice of $`\beta`$ update can be:
/// - [Fletcher-Reeves ](enum.Method.html#variant.FletcherReeves)
/// - [Polak-Ribiere ](enum.Method.html#variant.PolakRibiere)
///
/// $`\beta`$ is zero whenever $`\|g_i\|^2 \leq 10^{-12}`$, and with a nonzero
/// `restart_interval` the direction is reset to $`-g_i`$ every
/// `restart_interval` iterations.
///
/// Parameters
/// ----------
/// - __objective:__ value and gradient oracle
/// - __x0:__        initial guess (not modified)
/// - __config:__    tolerances, line search bracket, method and restarts
/// - __callback:__  User-defined function to be evaluated with two arguments (x,iter).
///                   It is evaluated at (x0,0) and then after each iteration.
///                   If it returns True, the function terminates early.
pub fn conjugate_gradient<S, F>(
    objective: &F,
    x0: ArrayView1<S>,
    config: &ConjugateGradient<S>,
    mut callback: impl FnMut(ArrayView1<S>, usize) -> bool,
) -> Result<Minimum<S>>
where
    S: NdFloat,
    F: Objective<S> + ?Sized,
{
    let method_name = match config.method {
        Method::FletcherReeves => "Conjugate gradient (FR)",
        Method::PolakRibiere => "Conjugate gradient (PR)",
    };
    config.validate()?;
    check_point(objective, x0, "conjugate gradient")?;

    // loop variables (pass from one iter to next)
    let mut x = x0.to_owned();
    let mut grad = gradient_at(objective, x.view())?;
    let mut grad_norm_sq = linalg::dot(&grad, &grad)?;
    let mut direction = linalg::scale(-S::one(), &grad);
    let mut iter = 0;

    let mut stopped = callback(x.view(), 0);
    while !stopped && iter < config.max_iter {
        let grad_norm = grad_norm_sq.sqrt();
        if grad_norm < config.epsilon {
            break;
        }

        if config.restart_interval > 0 && iter > 0 && iter % config.restart_interval == 0 {
            debug!("{}: restarting along the antigradient (i: {})", method_name, iter);
            direction = linalg::scale(-S::one(), &grad);
        }

        let alpha = config.line_search.search(objective, x.view(), direction.view())?;
        let x_next = linalg::step(&x, alpha, &direction)?;
        let grad_next = gradient_at(objective, x_next.view())?;
        let grad_next_norm_sq = linalg::dot(&grad_next, &grad_next)?;

        let beta = config
            .method
            .beta(&grad, &grad_next, grad_norm_sq, grad_next_norm_sq)?;
        trace!(
            "{}: i: {:>4}  |g|: {:<13e}  a: {:<13e}  b: {:<13e}",
            method_name, iter, grad_norm, alpha, beta
        );
        direction = linalg::step(&linalg::scale(-S::one(), &grad_next), beta, &direction)?;

        // update loop state variables
        x = x_next;
        grad = grad_next;
        grad_norm_sq = grad_next_norm_sq;
        iter += 1;
        stopped = callback(x.view(), iter);
    }

    Ok(finish(
        method_name,
        x,
        iter,
        grad_norm_sq.sqrt(),
        config.epsilon,
        stopped,
    ))
}
