//! Dense vector and matrix primitives with checked dimensions
//!
//! These are thin wrappers over `ndarray` arithmetic. The difference is
//! that a shape mismatch comes back as an [`Error`](../error/enum.Error.html)
//! instead of a panic, so that a solver can hand a badly-behaved oracle's
//! output straight back to the caller.
//!
//! Every function is pure and allocates its result.

use crate::error::{Error, Result};
use ndarray::prelude::*;
use ndarray::{Data, NdFloat};

/// Below this absolute determinant a 3x3 matrix is treated as singular.
pub const SINGULAR_DET: f64 = 1e-12;

/// Element-wise `a + b`.
pub fn add<A, Sa, Sb>(a: &ArrayBase<Sa, Ix1>, b: &ArrayBase<Sb, Ix1>) -> Result<Array1<A>>
where
    A: NdFloat,
    Sa: Data<Elem = A>,
    Sb: Data<Elem = A>,
{
    Error::check_len("add", a.len(), b.len())?;
    Ok(a + b)
}

/// Element-wise `a - b`.
pub fn sub<A, Sa, Sb>(a: &ArrayBase<Sa, Ix1>, b: &ArrayBase<Sb, Ix1>) -> Result<Array1<A>>
where
    A: NdFloat,
    Sa: Data<Elem = A>,
    Sb: Data<Elem = A>,
{
    Error::check_len("sub", a.len(), b.len())?;
    Ok(a - b)
}

/// `s * v`
pub fn scale<A, Sv>(s: A, v: &ArrayBase<Sv, Ix1>) -> Array1<A>
where
    A: NdFloat,
    Sv: Data<Elem = A>,
{
    v.mapv(|x| s * x)
}

/// `x + alpha * d`, the point reached by a step of length `alpha` along `d`.
pub fn step<A, Sx, Sd>(x: &ArrayBase<Sx, Ix1>, alpha: A, d: &ArrayBase<Sd, Ix1>) -> Result<Array1<A>>
where
    A: NdFloat,
    Sx: Data<Elem = A>,
    Sd: Data<Elem = A>,
{
    Error::check_len("step", x.len(), d.len())?;
    let mut out = x.to_owned();
    out.scaled_add(alpha, d);
    Ok(out)
}

pub fn dot<A, Sa, Sb>(a: &ArrayBase<Sa, Ix1>, b: &ArrayBase<Sb, Ix1>) -> Result<A>
where
    A: NdFloat,
    Sa: Data<Elem = A>,
    Sb: Data<Elem = A>,
{
    Error::check_len("dot", a.len(), b.len())?;
    Ok(a.dot(b))
}

/// Euclidean norm, `sqrt(dot(v, v))`.
pub fn norm<A, Sv>(v: &ArrayBase<Sv, Ix1>) -> A
where
    A: NdFloat,
    Sv: Data<Elem = A>,
{
    v.dot(v).sqrt()
}

/// All-zero `n x m` matrix.
pub fn zeros<A: NdFloat>(n: usize, m: usize) -> Array2<A> {
    Array2::zeros((n, m))
}

pub fn identity<A: NdFloat>(n: usize) -> Array2<A> {
    Array2::eye(n)
}

/// `M v`; the column count of `M` must equal the length of `v`.
pub fn mat_vec<A, Sm, Sv>(m: &ArrayBase<Sm, Ix2>, v: &ArrayBase<Sv, Ix1>) -> Result<Array1<A>>
where
    A: NdFloat,
    Sm: Data<Elem = A>,
    Sv: Data<Elem = A>,
{
    Error::check_len("mat_vec", m.ncols(), v.len())?;
    Ok(m.dot(v))
}

/// `a b^T`; `a` and `b` may have different lengths.
pub fn outer<A, Sa, Sb>(a: &ArrayBase<Sa, Ix1>, b: &ArrayBase<Sb, Ix1>) -> Array2<A>
where
    A: NdFloat,
    Sa: Data<Elem = A>,
    Sb: Data<Elem = A>,
{
    Array2::from_shape_fn((a.len(), b.len()), |(i, j)| a[i] * b[j])
}

pub fn matrix_add<A, Sa, Sb>(a: &ArrayBase<Sa, Ix2>, b: &ArrayBase<Sb, Ix2>) -> Result<Array2<A>>
where
    A: NdFloat,
    Sa: Data<Elem = A>,
    Sb: Data<Elem = A>,
{
    Error::check_shape("matrix_add", a.shape(), b.shape())?;
    Ok(a + b)
}

pub fn matrix_scale<A, Sm>(s: A, m: &ArrayBase<Sm, Ix2>) -> Array2<A>
where
    A: NdFloat,
    Sm: Data<Elem = A>,
{
    m.mapv(|x| s * x)
}

/// Closed-form inverse of a 3x3 matrix by cofactor expansion
///
/// Returns `Ok(None)` when `|det(M)| <` [`SINGULAR_DET`](constant.SINGULAR_DET.html);
/// nothing is divided by the near-zero determinant in that case.
/// Any other shape than 3x3 is an error.
pub fn inverse_3x3<A, Sm>(m: &ArrayBase<Sm, Ix2>) -> Result<Option<Array2<A>>>
where
    A: NdFloat,
    Sm: Data<Elem = A>,
{
    Error::check_shape("inverse_3x3", &[3, 3], m.shape())?;

    let c00 = m[[1, 1]] * m[[2, 2]] - m[[2, 1]] * m[[1, 2]];
    let c01 = m[[1, 0]] * m[[2, 2]] - m[[1, 2]] * m[[2, 0]];
    let c02 = m[[1, 0]] * m[[2, 1]] - m[[1, 1]] * m[[2, 0]];
    let det = m[[0, 0]] * c00 - m[[0, 1]] * c01 + m[[0, 2]] * c02;

    // NaN entries also land here
    if !(det.abs() >= A::from(SINGULAR_DET).unwrap()) {
        return Ok(None);
    }
    let inv_det = A::one() / det;

    let inv = array![
        [
            c00,
            m[[0, 2]] * m[[2, 1]] - m[[0, 1]] * m[[2, 2]],
            m[[0, 1]] * m[[1, 2]] - m[[0, 2]] * m[[1, 1]],
        ],
        [
            -c01,
            m[[0, 0]] * m[[2, 2]] - m[[0, 2]] * m[[2, 0]],
            m[[1, 0]] * m[[0, 2]] - m[[0, 0]] * m[[1, 2]],
        ],
        [
            c02,
            m[[2, 0]] * m[[0, 1]] - m[[0, 0]] * m[[2, 1]],
            m[[0, 0]] * m[[1, 1]] - m[[1, 0]] * m[[0, 1]],
        ],
    ];
    Ok(Some(inv * inv_det))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray_linalg::Inverse;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;

    #[test]
    fn vector_ops() {
        let a = array![1., 2., 3.];
        let b = array![4., -5., 6.];
        assert_eq!(add(&a, &b).unwrap(), array![5., -3., 9.]);
        assert_eq!(sub(&a, &b).unwrap(), array![-3., 7., -3.]);
        assert_eq!(scale(2., &a), array![2., 4., 6.]);
        assert_eq!(step(&a, 0.5, &b).unwrap(), array![3., -0.5, 6.]);
        assert_eq!(dot(&a, &b).unwrap(), 12.);
        assert_abs_diff_eq!(norm(&array![3., 4.]), 5.);
    }

    #[test]
    fn vector_length_mismatch() {
        let a = array![1., 2., 3.];
        let b = array![1., 2.];
        let expected = |op| Error::DimensionMismatch {
            op,
            expected: 3,
            found: 2,
        };
        assert_eq!(add(&a, &b), Err(expected("add")));
        assert_eq!(sub(&a, &b), Err(expected("sub")));
        assert_eq!(dot(&a, &b), Err(expected("dot")));
        assert_eq!(step(&a, 1., &b), Err(expected("step")));
    }

    #[test]
    fn additive_inverse_and_norm() {
        for _ in 0..20 {
            let a = Array1::random((5,), Uniform::new(-10., 10.));
            let zero = Array1::<f64>::zeros(5);
            let neg = sub(&zero, &a).unwrap();
            assert_eq!(add(&a, &neg).unwrap(), zero);
            assert!(norm(&a) > 0.);
        }
        assert_eq!(norm(&Array1::<f64>::zeros(4)), 0.);
    }

    #[test]
    fn matrix_ops() {
        let m = array![[1., 2.], [3., 4.], [5., 6.]];
        assert_eq!(mat_vec(&m, &array![1., -1.]).unwrap(), array![-1., -1., -1.]);
        assert_eq!(
            mat_vec(&m, &array![1., 1., 1.]),
            Err(Error::DimensionMismatch {
                op: "mat_vec",
                expected: 2,
                found: 3,
            })
        );

        let o = outer(&array![1., 2.], &array![3., 4., 5.]);
        assert_eq!(o, array![[3., 4., 5.], [6., 8., 10.]]);

        let sum = matrix_add(&identity(2), &matrix_scale(2., &zeros(2, 2))).unwrap();
        assert_eq!(sum, array![[1., 0.], [0., 1.]]);
        assert_eq!(matrix_scale(3., &identity::<f64>(2)), array![[3., 0.], [0., 3.]]);
        assert!(matrix_add(&identity::<f64>(2), &zeros(2, 3)).is_err());
    }

    #[test]
    fn inverse_of_identity() {
        let inv = inverse_3x3(&identity::<f64>(3)).unwrap();
        assert_eq!(inv, Some(identity(3)));
    }

    #[test]
    fn inverse_of_singular() {
        let m = array![[1., 2., 3.], [1., 2., 3.], [0., 1., -4.]];
        assert_eq!(inverse_3x3(&m).unwrap(), None);
        assert_eq!(inverse_3x3(&zeros::<f64>(3, 3)).unwrap(), None);
    }

    #[test]
    fn inverse_wrong_shape() {
        assert!(inverse_3x3(&identity::<f64>(2)).is_err());
    }

    #[test]
    fn inverse_matches_lapack() {
        for _ in 0..20 {
            let m = Array2::random((3, 3), Uniform::new(-1., 1.)) + identity::<f64>(3) * 3.;
            let inv = inverse_3x3(&m).unwrap().unwrap();
            assert_abs_diff_eq!(inv, m.inv().unwrap(), epsilon = 1e-10);
            assert_abs_diff_eq!(m.dot(&inv), identity(3), epsilon = 1e-10);
        }
    }
}

#[cfg(all(rustc_nightly, test))]
mod benches {
    use super::*;
    use test::Bencher;

    #[bench]
    fn bench_inverse_3x3(b: &mut Bencher) {
        let m = array![[4., 1., 0.], [1., 3., 1.], [0., 1., 2.]];
        b.iter(|| inverse_3x3(&m));
    }
}
