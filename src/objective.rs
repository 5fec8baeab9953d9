//! Objective oracles
//!
//! The solvers never see a formula, only something that can report the
//! value and gradient of the objective at a point, and, for Newton's
//! method, its Hessian. Implementations are expected to be pure
//! functions of the point.

use crate::error::{Error, Result};
use ndarray::prelude::*;
use ndarray::NdFloat;

/// A differentiable objective `f: R^n -> R`.
pub trait Objective<S> {
    /// Dimension the objective is defined for, if fixed.
    ///
    /// Solvers reject starting points of any other length up front.
    fn dim(&self) -> Option<usize> {
        None
    }

    fn value(&self, x: ArrayView1<S>) -> Result<S>;

    /// Must return a vector of the same length as `x`.
    fn gradient(&self, x: ArrayView1<S>) -> Result<Array1<S>>;
}

/// An objective that can also provide its (square) Hessian matrix.
pub trait Hessian<S>: Objective<S> {
    fn hessian(&self, x: ArrayView1<S>) -> Result<Array2<S>>;
}

/// Fails if `x` does not have the length `objective` is defined for.
pub fn check_point<S, F>(objective: &F, x: ArrayView1<S>, op: &'static str) -> Result<()>
where
    F: Objective<S> + ?Sized,
{
    match objective.dim() {
        Some(dim) => Error::check_len(op, dim, x.len()),
        None => Ok(()),
    }
}

/// Gradient at `x`, checked to have the same length as `x`.
pub(crate) fn gradient_at<S, F>(objective: &F, x: ArrayView1<S>) -> Result<Array1<S>>
where
    S: NdFloat,
    F: Objective<S> + ?Sized,
{
    let grad = objective.gradient(x)?;
    Error::check_len("gradient", x.len(), grad.len())?;
    Ok(grad)
}

/// Hessian at `x`, checked to be square with side `x.len()`.
pub(crate) fn hessian_at<S, F>(objective: &F, x: ArrayView1<S>) -> Result<Array2<S>>
where
    S: NdFloat,
    F: Hessian<S> + ?Sized,
{
    let hess = objective.hessian(x)?;
    Error::check_shape("hessian", &[x.len(), x.len()], hess.shape())?;
    Ok(hess)
}

/// Objective assembled from plain closures
///
/// The value and gradient closures are required; a Hessian closure can be
/// attached with [`with_hessian`](#method.with_hessian) to make the result
/// usable with Newton's method, and [`with_dim`](#method.with_dim) turns
/// points of any other length into a dimension mismatch.
#[derive(Debug, Clone)]
pub struct FnObjective<F, G, H = ()> {
    dim: Option<usize>,
    value: F,
    gradient: G,
    hessian: H,
}

impl<F, G> FnObjective<F, G> {
    pub fn new(value: F, gradient: G) -> Self {
        FnObjective {
            dim: None,
            value,
            gradient,
            hessian: (),
        }
    }
}

impl<F, G, H> FnObjective<F, G, H> {
    /// Reject points whose length is not `dim`.
    pub fn with_dim(self, dim: usize) -> Self {
        FnObjective {
            dim: Some(dim),
            ..self
        }
    }

    pub fn with_hessian<H2>(self, hessian: H2) -> FnObjective<F, G, H2> {
        FnObjective {
            dim: self.dim,
            value: self.value,
            gradient: self.gradient,
            hessian,
        }
    }
}

impl<S, F, G, H> Objective<S> for FnObjective<F, G, H>
where
    F: Fn(ArrayView1<S>) -> S,
    G: Fn(ArrayView1<S>) -> Array1<S>,
{
    fn dim(&self) -> Option<usize> {
        self.dim
    }

    fn value(&self, x: ArrayView1<S>) -> Result<S> {
        check_point(self, x.view(), "value")?;
        Ok((self.value)(x))
    }

    fn gradient(&self, x: ArrayView1<S>) -> Result<Array1<S>> {
        check_point(self, x.view(), "gradient")?;
        Ok((self.gradient)(x))
    }
}

impl<S, F, G, H> Hessian<S> for FnObjective<F, G, H>
where
    F: Fn(ArrayView1<S>) -> S,
    G: Fn(ArrayView1<S>) -> Array1<S>,
    H: Fn(ArrayView1<S>) -> Array2<S>,
{
    fn hessian(&self, x: ArrayView1<S>) -> Result<Array2<S>> {
        check_point(self, x.view(), "hessian")?;
        Ok((self.hessian)(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere() -> FnObjective<
        impl Fn(ArrayView1<f64>) -> f64,
        impl Fn(ArrayView1<f64>) -> Array1<f64>,
    > {
        FnObjective::new(|x: ArrayView1<f64>| x.dot(&x), |x: ArrayView1<f64>| &x * 2.)
    }

    #[test]
    fn closures() {
        let f = sphere();
        assert_eq!(Objective::<f64>::dim(&f), None);
        assert_eq!(f.value(array![1., 1., 1.].view()).unwrap(), 3.);
        assert_eq!(f.gradient(array![1., -2.].view()).unwrap(), array![2., -4.]);
    }

    #[test]
    fn fixed_dimension() {
        let f = sphere()
            .with_hessian(|x: ArrayView1<f64>| Array2::<f64>::eye(x.len()) * 2.)
            .with_dim(2);
        assert_eq!(Objective::<f64>::dim(&f), Some(2));
        assert!(f.value(array![1., 1.].view()).is_ok());
        assert_eq!(
            f.hessian(array![1., 1., 1.].view()),
            Err(Error::DimensionMismatch {
                op: "hessian",
                expected: 2,
                found: 3,
            })
        );
    }

    #[test]
    fn checked_gradient() {
        let bad = FnObjective::new(|_x: ArrayView1<f64>| 0., |_x: ArrayView1<f64>| array![0.]);
        assert_eq!(
            gradient_at(&bad, array![1., 2.].view()),
            Err(Error::DimensionMismatch {
                op: "gradient",
                expected: 2,
                found: 1,
            })
        );

        let bad = FnObjective::new(|_x: ArrayView1<f64>| 0., |x: ArrayView1<f64>| x.to_owned())
            .with_hessian(|_x: ArrayView1<f64>| Array2::eye(2));
        assert!(hessian_at(&bad, array![1., 2., 3.].view()).is_err());
        assert!(hessian_at(&bad, array![1., 2.].view()).is_ok());
    }
}
