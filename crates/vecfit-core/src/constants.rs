//! Numerical constants shared across the library
//!
//! Provides standardized tolerance values used by the linear algebra layer
//! and the fitting engine.

/// Tolerance for detecting near-zero values in division and singularity checks.
/// Used to prevent division by zero and detect ill-conditioned matrices.
pub const NEAR_ZERO: f64 = 1e-15;

/// Tolerance for deciding that a value which should be real has no imaginary part.
/// Applied relative to the magnitude of the value being checked.
pub const REAL_VALUE_TOL: f64 = 1e-10;

/// Singular values (or QR pivots) below this fraction of the largest one are
/// treated as zero by the least-squares solver.
pub const RANK_TOLERANCE: f64 = 1e-14;
