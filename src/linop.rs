//! Inverse-Hessian approximations as linear operators
//! building upon ndarray_linalg::operator

use crate::error::Result;
use crate::linalg;
use ndarray::prelude::*;
use ndarray::{Data, DataMut, DataOwned, NdFloat};
pub use ndarray_linalg::operator::LinearOperator;
use ndarray_linalg::Scalar;
use num_traits::Float;

/// Below this `|denominator|` a symmetric rank-1 update is not applied.
pub const SR1_SKIP: f64 = 1e-9;

/// Outcome of [`InverseHessian::sr1_update`](struct.InverseHessian.html#method.sr1_update)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sr1Update {
    /// The rank-1 correction was added.
    Applied,
    /// The denominator was too small; the approximation went back to identity.
    Reset,
}

/// Dense approximation `H` of the inverse Hessian
///
/// Starts out as the identity, and applying it to a gradient gives (minus)
/// a quasi-Newton search direction.
#[derive(Debug, Clone, PartialEq)]
pub struct InverseHessian<A> {
    h: Array2<A>,
}

impl<A: NdFloat> InverseHessian<A> {
    #[must_use]
    pub fn identity(n: usize) -> InverseHessian<A> {
        InverseHessian {
            h: linalg::identity(n),
        }
    }

    pub fn dim(&self) -> usize {
        self.h.nrows()
    }

    pub fn matrix(&self) -> ArrayView2<'_, A> {
        self.h.view()
    }

    /// Forget all accumulated curvature information.
    pub fn reset(&mut self) {
        self.h = linalg::identity(self.dim());
    }

    /// Exact elementwise symmetry check.
    pub fn is_symmetric(&self) -> bool {
        self.h == self.h.t()
    }

    /// Symmetric rank-1 update from a step `delta = x_next - x` and
    /// the matching gradient change `gamma = g_next - g`
    ///
    /// ```math
    /// \begin{aligned}
    /// w &= \delta - H\gamma \\
    /// H &\leftarrow H + \frac{w w^T}{\langle w, \gamma \rangle}
    /// \end{aligned}
    /// ```
    ///
    /// After an applied update `H` satisfies the secant condition `H gamma = delta`.
    /// If `|<w, gamma>| <=` [`SR1_SKIP`](constant.SR1_SKIP.html) the update would be
    /// numerically unstable, and `H` is reset to the identity instead.
    pub fn sr1_update<Sd, Sg>(
        &mut self,
        delta: &ArrayBase<Sd, Ix1>,
        gamma: &ArrayBase<Sg, Ix1>,
    ) -> Result<Sr1Update>
    where
        Sd: Data<Elem = A>,
        Sg: Data<Elem = A>,
    {
        let w = linalg::sub(delta, &linalg::mat_vec(&self.h, gamma)?)?;
        let denom = linalg::dot(&w, gamma)?;

        if Float::abs(denom) > A::from(SR1_SKIP).unwrap() {
            let correction = linalg::matrix_scale(A::one() / denom, &linalg::outer(&w, &w));
            self.h = linalg::matrix_add(&self.h, &correction)?;
            Ok(Sr1Update::Applied)
        } else {
            self.reset();
            Ok(Sr1Update::Reset)
        }
    }
}

impl<A> LinearOperator for InverseHessian<A>
where
    A: NdFloat + Scalar,
{
    type Elem = A;

    /// Apply operator out-place
    #[inline]
    fn apply<S>(&self, a: &ArrayBase<S, Ix1>) -> Array1<S::Elem>
    where
        S: Data<Elem = Self::Elem>,
    {
        self.h.dot(a)
    }

    /// Apply operator in-place
    #[inline]
    fn apply_mut<S>(&self, a: &mut ArrayBase<S, Ix1>)
    where
        S: DataMut<Elem = Self::Elem>,
    {
        let b = self.h.dot(&*a);
        a.assign(&b);
    }

    /// Apply operator with move
    #[inline]
    fn apply_into<S>(&self, a: ArrayBase<S, Ix1>) -> ArrayBase<S, Ix1>
    where
        S: DataOwned<Elem = Self::Elem> + DataMut,
    {
        let mut a = a;
        self.apply_mut(&mut a);
        a
    }

    /// Apply operator to matrix out-place
    #[inline]
    fn apply2<S>(&self, a: &ArrayBase<S, Ix2>) -> Array2<S::Elem>
    where
        S: Data<Elem = Self::Elem>,
    {
        self.h.dot(a)
    }

    /// Apply operator to matrix in-place
    #[inline]
    fn apply2_mut<S>(&self, a: &mut ArrayBase<S, Ix2>)
    where
        S: DataMut<Elem = Self::Elem>,
    {
        let b = self.h.dot(&*a);
        a.assign(&b);
    }

    /// Apply operator to matrix with move
    #[inline]
    fn apply2_into<S>(&self, a: ArrayBase<S, Ix2>) -> ArrayBase<S, Ix2>
    where
        S: DataOwned<Elem = Self::Elem> + DataMut,
    {
        let mut a = a;
        self.apply2_mut(&mut a);
        a
    }
}
