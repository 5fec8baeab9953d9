//! Objectives with known analytic derivatives, for checking the solvers.
//!
//! `Quartic` and `ExpCoupled` are fixed 3-D problems and reject points of any
//! other length. `Quadratic` works in any dimension.

use crate::error::{Error, Result};
use crate::objective::{check_point, Hessian, Objective};
use ndarray::prelude::*;

/// `f(x) = 2 x1^4 + x2^4 + x1^2 x2^2 + x3^4 + x1^2 x3^2 + x1 + x2`
///
/// Its Hessian vanishes at the origin. The local minimizer reached by
/// descending from the origin lies in the plane `x3 = 0` with `x1, x2 < 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quartic;

impl Objective<f64> for Quartic {
    fn dim(&self) -> Option<usize> {
        Some(3)
    }

    fn value(&self, x: ArrayView1<f64>) -> Result<f64> {
        check_point(self, x, "quartic")?;
        let (x1, x2, x3) = (x[0], x[1], x[2]);
        Ok(2. * x1.powi(4) + x2.powi(4) + x1.powi(2) * x2.powi(2) + x3.powi(4) + x1.powi(2) * x3.powi(2) + x1 + x2)
    }

    fn gradient(&self, x: ArrayView1<f64>) -> Result<Array1<f64>> {
        check_point(self, x, "quartic")?;
        let (x1, x2, x3) = (x[0], x[1], x[2]);
        Ok(array![
            8. * x1.powi(3) + 2. * x1 * x2.powi(2) + 2. * x1 * x3.powi(2) + 1.,
            4. * x2.powi(3) + 2. * x1.powi(2) * x2 + 1.,
            4. * x3.powi(3) + 2. * x1.powi(2) * x3,
        ])
    }
}

impl Hessian<f64> for Quartic {
    fn hessian(&self, x: ArrayView1<f64>) -> Result<Array2<f64>> {
        check_point(self, x, "quartic")?;
        let (x1, x2, x3) = (x[0], x[1], x[2]);
        let h01 = 4. * x1 * x2;
        let h02 = 4. * x1 * x3;
        Ok(array![
            [24. * x1.powi(2) + 2. * x2.powi(2) + 2. * x3.powi(2), h01, h02],
            [h01, 12. * x2.powi(2) + 2. * x1.powi(2), 0.],
            [h02, 0., 12. * x3.powi(2) + 2. * x1.powi(2)],
        ])
    }
}

/// `f(x) = x1^2 + 2 x2^2 + x1^2 x2^2 + 2 x3 + exp(x2^2 + x3^2) - x2`
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpCoupled;

impl Objective<f64> for ExpCoupled {
    fn dim(&self) -> Option<usize> {
        Some(3)
    }

    fn value(&self, x: ArrayView1<f64>) -> Result<f64> {
        check_point(self, x, "exp coupled")?;
        let (x1, x2, x3) = (x[0], x[1], x[2]);
        Ok(x1.powi(2) + 2. * x2.powi(2) + x1.powi(2) * x2.powi(2) + 2. * x3 + (x2.powi(2) + x3.powi(2)).exp() - x2)
    }

    fn gradient(&self, x: ArrayView1<f64>) -> Result<Array1<f64>> {
        check_point(self, x, "exp coupled")?;
        let (x1, x2, x3) = (x[0], x[1], x[2]);
        let e = (x2.powi(2) + x3.powi(2)).exp();
        Ok(array![
            2. * x1 + 2. * x1 * x2.powi(2),
            4. * x2 + 2. * x1.powi(2) * x2 + 2. * x2 * e - 1.,
            2. + 2. * x3 * e,
        ])
    }
}

impl Hessian<f64> for ExpCoupled {
    fn hessian(&self, x: ArrayView1<f64>) -> Result<Array2<f64>> {
        check_point(self, x, "exp coupled")?;
        let (x1, x2, x3) = (x[0], x[1], x[2]);
        let e = (x2.powi(2) + x3.powi(2)).exp();
        let h01 = 4. * x1 * x2;
        let h12 = 4. * x2 * x3 * e;
        Ok(array![
            [2. + 2. * x2.powi(2), h01, 0.],
            [h01, 4. + 2. * x1.powi(2) + 2. * e + 4. * x2.powi(2) * e, h12],
            [0., h12, 2. * e + 4. * x3.powi(2) * e],
        ])
    }
}

/// `f(x) = (x - c)^T A (x - c) / 2` with constant Hessian `A`
///
/// For symmetric positive definite `A` the unique minimizer is `c`, with
/// value zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Quadratic {
    a: Array2<f64>,
    center: Array1<f64>,
}

impl Quadratic {
    /// Fails unless `a` is square with side `center.len()`.
    pub fn new(a: Array2<f64>, center: Array1<f64>) -> Result<Quadratic> {
        let n = center.len();
        Error::check_shape("quadratic", &[n, n], a.shape())?;
        Ok(Quadratic { a, center })
    }

    pub fn center(&self) -> ArrayView1<'_, f64> {
        self.center.view()
    }
}

impl Objective<f64> for Quadratic {
    fn dim(&self) -> Option<usize> {
        Some(self.center.len())
    }

    fn value(&self, x: ArrayView1<f64>) -> Result<f64> {
        check_point(self, x, "quadratic")?;
        let r = &x - &self.center;
        Ok(0.5 * r.dot(&self.a.dot(&r)))
    }

    fn gradient(&self, x: ArrayView1<f64>) -> Result<Array1<f64>> {
        check_point(self, x, "quadratic")?;
        Ok(self.a.dot(&(&x - &self.center)))
    }
}

impl Hessian<f64> for Quadratic {
    fn hessian(&self, x: ArrayView1<f64>) -> Result<Array2<f64>> {
        check_point(self, x, "quadratic")?;
        Ok(self.a.clone())
    }
}
