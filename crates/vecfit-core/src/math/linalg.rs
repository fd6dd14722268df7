//! Linear algebra operations
//!
//! This module provides the small set of dense operations the fitting engine
//! needs: Householder QR (thin factors and least-squares solve), eigenvalues
//! of a real square matrix, and column norms. nalgebra is the backend; all
//! ndarray<->nalgebra conversions are contained here so callers never touch
//! the backend types.

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, ArrayView2};
use num_complex::Complex64;

use crate::constants::{NEAR_ZERO, RANK_TOLERANCE};

/// Result of a QR least squares solve
#[derive(Debug, Clone)]
pub struct LstsqResult {
    pub solution: Array1<f64>,
    /// Ratio of the largest to the smallest |R_ii| (or singular value)
    pub condition: f64,
    /// Numerical rank; smaller than the column count when the SVD fallback was used
    pub rank: usize,
}

// ============================================================================
// Conversion helpers (internal)
// ============================================================================

/// Convert an ndarray view to nalgebra DMatrix<f64>, padding with zero rows up to `min_rows`
#[inline]
fn to_na_real_padded(a: ArrayView2<'_, f64>, min_rows: usize) -> DMatrix<f64> {
    let (m, n) = a.dim();
    DMatrix::from_fn(m.max(min_rows), n, |i, j| if i < m { a[[i, j]] } else { 0.0 })
}

/// Convert nalgebra DMatrix<f64> to ndarray Array2<f64>, keeping the first `rows` rows
#[inline]
fn from_na_real_rows(m: &DMatrix<f64>, rows: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows.min(m.nrows()), m.ncols()), |(i, j)| m[(i, j)])
}

// ============================================================================
// Eigenvalue decomposition
// ============================================================================

/// Compute complex eigenvalues of a real matrix
///
/// Returns error if matrix is not square.
pub fn eigenvalues(a: &Array2<f64>) -> Result<Vec<Complex64>, &'static str> {
    let (m, n) = a.dim();
    if m != n {
        return Err("Matrix must be square");
    }
    if m == 0 {
        return Ok(Vec::new());
    }
    if a.iter().any(|v| !v.is_finite()) {
        return Err("Matrix has non-finite entries");
    }

    let mat = to_na_real_padded(a.view(), 0);
    let eigs = mat.complex_eigenvalues();

    Ok(eigs.iter().map(|e| Complex64::new(e.re, e.im)).collect())
}

// ============================================================================
// QR Decomposition
// ============================================================================

/// Thin QR decomposition `A = Q R`
///
/// Returns `(Q, R)` with `Q` of shape `(m, n)` and `R` of shape `(n, n)`.
/// A wide matrix (`m < n`) is treated as if padded with zero rows, which
/// leaves every least-squares problem built on it unchanged; only the first
/// `m` rows of the padded `Q` are returned.
pub fn qr_thin(a: &Array2<f64>) -> Result<(Array2<f64>, Array2<f64>), &'static str> {
    let (m, n) = a.dim();
    if m == 0 || n == 0 {
        return Err("Empty matrix");
    }

    let qr = to_na_real_padded(a.view(), n).qr();
    let q = from_na_real_rows(&qr.q(), m);
    let r = from_na_real_rows(&qr.r(), n);

    Ok((q, r))
}

// ============================================================================
// Least Squares
// ============================================================================

/// Solve the least squares problem `min ||Ax - b||` with Householder QR
///
/// Solves `R x = Q^T b` by back substitution; no normal equations are formed.
/// When `R` is numerically singular the minimum-norm solution of a truncated
/// SVD is returned instead, dropping singular values below
/// [`RANK_TOLERANCE`] relative to the largest one.
pub fn lstsq_qr(a: &Array2<f64>, b: &Array1<f64>) -> Result<LstsqResult, &'static str> {
    let (m, n) = a.dim();
    if m == 0 || n == 0 {
        return Err("Empty matrix");
    }
    if b.len() != m {
        return Err("Dimension mismatch");
    }

    let a_na = to_na_real_padded(a.view(), n);
    let b_na = DVector::from_fn(m.max(n), |i, _| if i < m { b[i] } else { 0.0 });

    let qr = a_na.clone().qr();
    let r = qr.r();

    let diag: Vec<f64> = (0..n).map(|i| r[(i, i)].abs()).collect();
    let r_max = diag.iter().cloned().fold(0.0, f64::max);
    let r_min = diag.iter().cloned().fold(f64::INFINITY, f64::min);
    if r_min <= RANK_TOLERANCE * r_max || r_max == 0.0 {
        return lstsq_svd(a_na, &b_na);
    }

    let qtb = qr.q().transpose() * b_na;
    let solution = r
        .solve_upper_triangular(&qtb)
        .ok_or("Triangular solve failed")?;

    Ok(LstsqResult {
        solution: Array1::from_iter(solution.iter().cloned()),
        condition: r_max / r_min,
        rank: n,
    })
}

/// Minimum-norm least squares through a truncated SVD
fn lstsq_svd(a: DMatrix<f64>, b: &DVector<f64>) -> Result<LstsqResult, &'static str> {
    let n = a.ncols();
    let svd = a.svd(true, true);

    let sigma_max = svd.singular_values.max();
    let sigma_min = svd.singular_values.min();
    let eps = RANK_TOLERANCE * sigma_max;
    let rank = svd.singular_values.iter().filter(|&&s| s > eps).count();

    let solution = svd.solve(b, eps).map_err(|_| "SVD solve failed")?;
    let condition = if sigma_min > 0.0 {
        sigma_max / sigma_min
    } else {
        f64::INFINITY
    };

    log::debug!(
        "rank deficient least squares: rank {} of {}, condition ~ {:e}",
        rank,
        n,
        condition
    );

    Ok(LstsqResult {
        solution: Array1::from_iter(solution.iter().take(n).cloned()),
        condition,
        rank,
    })
}

/// Euclidean norm of every column
pub fn column_norms(a: &Array2<f64>) -> Array1<f64> {
    a.columns()
        .into_iter()
        .map(|col| col.iter().map(|v| v * v).sum::<f64>().sqrt())
        .collect()
}

/// Solve least squares after scaling every column to unit norm
///
/// The returned solution is already un-scaled. Zero columns are left as they
/// are and end up in the null space handled by [`lstsq_qr`].
pub fn lstsq_qr_scaled(a: &Array2<f64>, b: &Array1<f64>) -> Result<LstsqResult, &'static str> {
    let scale = column_norms(a).mapv(|norm| if norm > NEAR_ZERO { 1.0 / norm } else { 1.0 });

    let mut scaled = a.clone();
    for (mut col, &s) in scaled.columns_mut().into_iter().zip(scale.iter()) {
        col *= s;
    }

    let mut result = lstsq_qr(&scaled, b)?;
    result.solution *= &scale;
    Ok(result)
}
