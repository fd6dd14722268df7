//! Error types for Vector Fitting
//!
//! Every failure is fatal for the current fit and is returned to the caller
//! as a value; nothing is retried and no partial model is kept.

use num_complex::Complex64;
use thiserror::Error;

/// Top-level fitting error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("invalid input: {0}")]
    InputValidation(#[from] InputValidationError),

    #[error("numerical consistency failure: {0}")]
    NumericalConsistency(#[from] NumericalConsistencyError),
}

/// Rejected input, detected before any numerical work starts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputValidationError {
    #[error("sample set is empty")]
    EmptySamples,

    #[error("pole set is empty")]
    EmptyPoles,

    #[error("requested model order must be positive")]
    ZeroOrder,

    #[error("samples carry no response channels")]
    NoResponseChannels,

    #[error("sample {index} has {found} response channels, expected {expected}")]
    ChannelCountMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("sample {index} contains a non-finite value")]
    NonFiniteSample { index: usize },

    #[error("weight matrix has shape {found:?}, expected {expected:?}")]
    WeightShape {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("pole {index} ({pole}) is not followed by its complex conjugate")]
    UnpairedPole { index: usize, pole: Complex64 },
}

/// A value that must be real (or representable) is not
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericalConsistencyError {
    #[error("pole matrix entry ({row}, {col}) is not purely real (imag = {imag:e})")]
    NonRealPoleMatrix { row: usize, col: usize, imag: f64 },

    #[error("can not relax constant term (d = {0:e})")]
    CannotRelaxConstantTerm(f64),

    #[error("eigenvalues do not form conjugate pairs ({upper} upper, {lower} lower)")]
    UnpairedEigenvalues { upper: usize, lower: usize },

    #[error("linear algebra failure: {0}")]
    LinearAlgebra(&'static str),
}

impl From<&'static str> for NumericalConsistencyError {
    fn from(message: &'static str) -> Self {
        NumericalConsistencyError::LinearAlgebra(message)
    }
}

impl From<&'static str> for FitError {
    fn from(message: &'static str) -> Self {
        FitError::NumericalConsistency(message.into())
    }
}
