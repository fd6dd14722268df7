//! Mathematical building blocks
//!
//! Dense linear algebra used by the fitting engine.

pub mod linalg;
