//! Golden Section line search
//!
//! Every solver in [`smooth`](../smooth/index.html) picks its step length
//! by minimizing the objective along the search direction over a fixed
//! bracket `[0, max_alpha]`. This is a derivative-free search that only
//! compares function values, so it needs
//! `alpha -> f(x + alpha * d)` to be unimodal on the bracket. That holds
//! near a well-behaved minimum but not in general, and nothing here
//! checks it.

use crate::error::{Error, Result};
use crate::linalg;
use crate::objective::Objective;
use ndarray::prelude::*;
use ndarray::NdFloat;

/// `2 - phi = (3 - sqrt(5)) / 2`, where `phi` is the golden ratio.
const RES_PHI: f64 = 0.381_966_011_250_105_1;

/// Bracket and tolerance of the step length search
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(default, bound(deserialize = "S: NdFloat + serde::Deserialize<'de>"))
)]
pub struct LineSearch<S> {
    /// Upper end of the bracket `[0, max_alpha]`.
    pub max_alpha: S,
    /// The search stops once the bracket is at most this wide.
    pub tol: S,
}

impl<S: NdFloat> Default for LineSearch<S> {
    fn default() -> Self {
        LineSearch {
            max_alpha: S::one(),
            tol: S::from(1e-6).unwrap(),
        }
    }
}

impl<S: NdFloat> LineSearch<S> {
    pub fn new(max_alpha: S, tol: S) -> Self {
        LineSearch { max_alpha, tol }
    }

    pub fn validate(&self) -> Result<()> {
        positive("line search max_alpha", self.max_alpha)?;
        positive("line search tolerance", self.tol)
    }

    /// Step length along `direction` from `x`, searched over `[0, max_alpha]`.
    pub fn search<F>(&self, objective: &F, x: ArrayView1<S>, direction: ArrayView1<S>) -> Result<S>
    where
        F: Objective<S> + ?Sized,
    {
        golden_section_search(objective, x, direction, S::zero(), self.max_alpha, self.tol)
    }
}

pub(crate) fn positive<S: NdFloat>(name: &'static str, value: S) -> Result<()> {
    if value.is_finite() && value > S::zero() {
        Ok(())
    } else {
        Err(Error::InvalidConfig {
            name,
            value: value.to_f64().unwrap_or(std::f64::NAN),
            reason: "must be positive and finite",
        })
    }
}

/// Golden Section Search along a ray
///
/// Approximately minimizes `f(x + alpha * direction)` over `alpha` in `[a, b]`
/// with [`golden_section`](fn.golden_section.html).
pub fn golden_section_search<S, F>(
    objective: &F,
    x: ArrayView1<S>,
    direction: ArrayView1<S>,
    a: S,
    b: S,
    tol: S,
) -> Result<S>
where
    S: NdFloat,
    F: Objective<S> + ?Sized,
{
    Error::check_len("line search", x.len(), direction.len())?;
    golden_section(
        |alpha| objective.value(linalg::step(&x, alpha, &direction)?.view()),
        a,
        b,
        tol,
    )
}

/// Golden Section Search
///
/// Minimizes a scalar function _func_ by shrinking the interval given by
/// _a_, _b_ by the golden ratio each step, keeping two interior probes
/// at `a + (2 - phi)(b - a)` and `b - (2 - phi)(b - a)`. One probe value is
/// carried over from the previous step, so each step costs a single
/// evaluation. Stops once `|b - a| <= tol` and returns the midpoint of
/// the final interval. See
/// [Wikipedia](https://en.wikipedia.org/wiki/Golden-section_search)
/// for more info.
///
/// Errors from _func_ are propagated immediately.
pub fn golden_section<S, F>(mut func: F, a: S, b: S, tol: S) -> Result<S>
where
    S: NdFloat,
    F: FnMut(S) -> Result<S>,
{
    positive("golden section tolerance", tol)?;
    let two = S::from(2.).unwrap();
    let res_phi = S::from(RES_PHI).unwrap();

    let (mut a, mut b) = if a < b { (a, b) } else { (b, a) };
    let width = b - a;
    if !(width > tol) {
        return Ok((a + b) / two);
    }

    // Required steps to achieve tolerance. Once the bracket gets down to a
    // few ulps it stops shrinking, so the count also bounds the loop.
    let invphi = S::one() - res_phi;
    let n = ((tol / width).ln() / invphi.ln()).ceil().to_usize().unwrap_or(0) + 1;

    let mut x1 = a + res_phi * (b - a);
    let mut x2 = b - res_phi * (b - a);
    let mut f1 = func(x1)?;
    let mut f2 = func(x2)?;

    for _iter in 0..n {
        if (b - a).abs() <= tol {
            break;
        }
        if f1 < f2 {
            b = x2;
            x2 = x1;
            f2 = f1;
            x1 = a + res_phi * (b - a);
            f1 = func(x1)?;
        } else {
            a = x1;
            x1 = x2;
            f1 = f2;
            x2 = b - res_phi * (b - a);
            f2 = func(x2)?;
        }
    }
    Ok((a + b) / two)
}


#[cfg(all(rustc_nightly, test))]
mod benches {
    use super::*;
    use test::Bencher;

    #[bench]
    fn bench_golden_section(b: &mut Bencher) {
        b.iter(|| golden_section(|x: f64| Ok((x - 0.3).powi(2)), 0., 1., 1e-8));
    }
}
