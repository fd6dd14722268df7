//! Vector Fitting algorithm for rational approximation of frequency responses
//!
//! Approximates a set of sampled responses sharing one pole set by
//!   f(s) = sum_m c_m / (s - p_m) + d + s * e
//! and delivers the result as a state-space realization (A, B, C, D, E).
//! One call to [`VectorFitting::fit`] performs a single relocation pass;
//! repeated calls refine the poles.
//!
//! # References
//!
//! - B. Gustavsen, A. Semlyen, "Rational Approximation of Frequency Domain Responses
//!   by Vector Fitting", IEEE Trans. Power Delivery, vol. 14, no. 3, 1999
//! - B. Gustavsen, "Improving the Pole Relocating Properties of Vector Fitting",
//!   IEEE Trans. Power Delivery, vol. 21, no. 3, 2006
//! - D. Deschrijver, M. Mrozowski, T. Dhaene, D. De Zutter, "Macromodeling of
//!   Multiport Systems Using a Fast Implementation of the Vector Fitting Method",
//!   IEEE Microwave and Wireless Components Letters, vol. 18, no. 6, 2008

mod basis;
pub mod constants;
mod core;
pub mod error;
mod init;
mod model;
mod options;
mod poles;
mod relocation;
mod residues;
mod samples;
mod state_space;

pub use self::core::{fit, VectorFitting};
pub use error::{FitError, InputValidationError, NumericalConsistencyError};
pub use init::{starting_poles, PoleSpacing};
pub use model::Model;
pub use options::{AsymptoticTrend, Options};
pub use poles::{is_real_pole, PoleKind, PoleSet};
pub use relocation::{relocate_poles, PoleRelocationResult};
pub use residues::{identify_residues, ResidueResult};
pub use samples::{Sample, SampleSet};
pub use state_space::{RealStateSpace, Realization, StateSpace};
