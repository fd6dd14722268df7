//! Python bindings for vecfit-core
//!
//! This module exposes the Vector Fitting engine to Python via PyO3.
//!
//! ## Classes
//!
//! - `VectorFitting` - Rational approximation of sampled frequency responses

use pyo3::prelude::*;

mod vector_fitting;

pub use vector_fitting::PyVectorFitting;

/// vecfit_python - Python bindings for the vecfit Vector Fitting engine
///
/// Example:
///     >>> import numpy as np
///     >>> import vecfit_python as vecfit
///     >>> s = 1j * np.linspace(0.1, 10.0, 50)
///     >>> f = (2.0 / (s + 1.0))[:, None]
///     >>> vf = vecfit.VectorFitting(s, f, order=1, trend="zero")
///     >>> vf.fit()
///     >>> print(vf.poles, vf.rmse())
#[pymodule]
fn vecfit_python(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyVectorFitting>()?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
