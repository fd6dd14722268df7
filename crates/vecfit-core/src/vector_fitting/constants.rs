//! Constants for Vector Fitting algorithms
//!
//! Centralizes magic numbers to improve code clarity and maintainability.

// ============================================================================
// Numerical tolerances
// ============================================================================

/// Tolerance for considering a pole as real (imaginary part threshold,
/// relative to the pole magnitude)
pub const REAL_POLE_TOLERANCE: f64 = 1e-12;

/// Lower bound on |D| of the relaxed scaling function before it is pinned
pub const RELAX_TOLERANCE_LOW: f64 = 1e-18;

/// Upper bound on |D| of the relaxed scaling function before it is pinned
pub const RELAX_TOLERANCE_HIGH: f64 = 1e18;

// ============================================================================
// Pole initialization parameters
// ============================================================================

/// Damping ratio for complex pole initialization
/// (real part = -DAMPING_RATIO * omega)
pub const COMPLEX_POLE_DAMPING_RATIO: f64 = 0.01;

/// Fraction of the second sample used as lower band edge when the first one is DC
pub const DC_EDGE_FRACTION: f64 = 1e-3;

/// Lower band edge (rad/s) used when no non-zero sample is available
pub const MIN_ANGULAR_FREQUENCY: f64 = 1e-6;
