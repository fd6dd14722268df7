//! vecfit-core: Vector Fitting library
//!
//! Rational pole-residue macromodels of sampled frequency responses.
//!
//! ## Modules
//!
//! - `constants` - Numerical tolerances
//! - `math` - Dense linear algebra (QR least squares, eigenvalues)
//! - `vector_fitting` - Vector Fitting engine and state-space realization

pub mod constants;
pub mod math;
pub mod vector_fitting;

pub use vector_fitting::{
    AsymptoticTrend, FitError, Model, Options, PoleSet, PoleSpacing, Sample, SampleSet,
    StateSpace, VectorFitting,
};
