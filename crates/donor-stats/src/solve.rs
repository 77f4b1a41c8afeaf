//! Thin Cholesky wrapper over faer.

use faer::linalg::solvers::{Llt, Solve};
use faer::{Mat, Side};

use crate::error::{Result, StatsError};

/// Cholesky-factor a symmetric positive definite matrix.
pub(crate) fn cholesky(matrix: &Mat<f64>) -> Result<Llt<f64>> {
    matrix
        .as_ref()
        .llt(Side::Lower)
        .map_err(|_| StatsError::Singular)
}

/// Solve `A x = b` for each right-hand-side column via an existing factor.
pub(crate) fn solve(factor: &Llt<f64>, rhs: &Mat<f64>) -> Mat<f64> {
    factor.solve(rhs.as_ref())
}

/// Invert a symmetric positive definite matrix via its Cholesky factor.
pub(crate) fn invert(factor: &Llt<f64>, dim: usize) -> Mat<f64> {
    let identity = Mat::from_fn(dim, dim, |i, j| if i == j { 1.0 } else { 0.0 });
    factor.solve(identity.as_ref())
}
