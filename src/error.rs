//! Error type shared by every fallible operation in the crate
//!
//! Only contract violations end up here: mismatched dimensions, an
//! unknown method tag, or an unusable configuration. Numerical trouble
//! inside a solver (singular Hessians, bad secant updates, ...) is
//! handled locally by the solver and is never reported as an `Error`,
//! and running out of iterations is reported through
//! [`Termination`](../smooth/enum.Termination.html).

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Two vectors, or a matrix and a vector, do not have compatible lengths.
    #[error("dimension mismatch in `{op}`: expected length {expected}, found {found}")]
    DimensionMismatch {
        op: &'static str,
        expected: usize,
        found: usize,
    },

    /// Two matrices do not have the same shape, or a matrix has the wrong shape.
    #[error("shape mismatch in `{op}`: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        op: &'static str,
        expected: [usize; 2],
        found: [usize; 2],
    },

    /// A solver specialized to a fixed dimension was handed another one.
    #[error("{solver} only supports {expected}-dimensional points, got {found}")]
    UnsupportedDimension {
        solver: &'static str,
        expected: usize,
        found: usize,
    },

    /// Unrecognized conjugate gradient method tag.
    #[error("unknown conjugate gradient method {0:?} (expected \"FR\" or \"PR\")")]
    UnknownMethod(String),

    /// A tolerance or bound that the solvers cannot work with.
    #[error("invalid {name} ({value}): {reason}")]
    InvalidConfig {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl Error {
    pub(crate) fn check_len(op: &'static str, expected: usize, found: usize) -> Result<()> {
        if expected == found {
            Ok(())
        } else {
            Err(Error::DimensionMismatch { op, expected, found })
        }
    }

    pub(crate) fn check_shape(op: &'static str, expected: &[usize], found: &[usize]) -> Result<()> {
        if expected == found {
            Ok(())
        } else {
            Err(Error::ShapeMismatch {
                op,
                expected: [expected[0], expected[1]],
                found: [found[0], found[1]],
            })
        }
    }
}
