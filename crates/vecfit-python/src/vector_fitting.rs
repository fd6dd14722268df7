//! Python bindings for VectorFitting class

use num_complex::Complex64;
use numpy::{PyArray1, PyArray2, PyReadonlyArray2, ToPyArray};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use vecfit_core::vector_fitting::{
    AsymptoticTrend, FitError, Model, Options, PoleSpacing, Sample, VectorFitting,
};

/// Python wrapper for VectorFitting
#[pyclass(name = "VectorFitting")]
pub struct PyVectorFitting {
    inner: VectorFitting,
}

/// Input errors become `ValueError`, numerical failures `RuntimeError`
fn to_py_err(err: FitError) -> PyErr {
    match err {
        FitError::InputValidation(_) => PyValueError::new_err(err.to_string()),
        FitError::NumericalConsistency(_) => PyRuntimeError::new_err(err.to_string()),
    }
}

fn not_fitted() -> PyErr {
    PyRuntimeError::new_err("Model not fitted yet")
}

impl PyVectorFitting {
    fn model(&self) -> PyResult<&Model> {
        self.inner.model().ok_or_else(not_fitted)
    }
}

#[pymethods]
impl PyVectorFitting {
    /// Create a new VectorFitting instance
    ///
    /// Args:
    ///     s: Complex frequencies of the samples, length Ns
    ///     responses: Sampled responses, shape [Ns, Nc]
    ///     poles: Starting poles; every complex pole followed by its conjugate
    ///     order: Number of generated starting poles, used when `poles` is not given
    ///     spacing: Spacing of generated poles ('linear' or 'log', default: 'log')
    ///     weights: Optional weights, shape [Ns, Nc]
    ///     trend: Asymptotic trend ('zero', 'constant' or 'linear', default: 'constant')
    ///     relax: Use relaxed pole identification (default: True)
    ///     stable: Reflect unstable poles (default: True)
    ///     complex_state_space: Keep the complex diagonal realization (default: False)
    ///     skip_pole_identification: Keep the starting poles (default: False)
    ///     skip_residue_identification: Produce a pole-only model (default: False)
    #[new]
    #[pyo3(signature = (s, responses, poles=None, order=None, spacing="log", weights=None, trend="constant", relax=true, stable=true, complex_state_space=false, skip_pole_identification=false, skip_residue_identification=false))]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        s: Vec<Complex64>,
        responses: PyReadonlyArray2<'_, Complex64>,
        poles: Option<Vec<Complex64>>,
        order: Option<usize>,
        spacing: &str,
        weights: Option<PyReadonlyArray2<'_, f64>>,
        trend: &str,
        relax: bool,
        stable: bool,
        complex_state_space: bool,
        skip_pole_identification: bool,
        skip_residue_identification: bool,
    ) -> PyResult<Self> {
        let responses = responses.as_array();
        if responses.nrows() != s.len() {
            return Err(PyValueError::new_err(format!(
                "responses must have one row per frequency: expected {}, got {}",
                s.len(),
                responses.nrows()
            )));
        }

        let samples: Vec<Sample> = s
            .iter()
            .zip(responses.rows())
            .map(|(&s, row)| Sample::new(s, row.to_owned()))
            .collect();
        let weights = weights.map(|w| w.as_array().to_owned());

        let trend: AsymptoticTrend = trend.parse().map_err(PyValueError::new_err)?;
        let options = Options::default()
            .with_asymptotic_trend(trend)
            .with_relax(relax)
            .with_stable(stable)
            .with_complex_state_space(complex_state_space)
            .with_skip_pole_identification(skip_pole_identification)
            .with_skip_residue_identification(skip_residue_identification);

        let inner = match (poles, order) {
            (Some(poles), _) => VectorFitting::with_weights(samples, poles, weights, options),
            (None, Some(order)) => {
                let spacing: PoleSpacing = spacing.parse().map_err(PyValueError::new_err)?;
                VectorFitting::with_order(samples, order, spacing, weights, options)
            }
            (None, None) => {
                return Err(PyValueError::new_err(
                    "Either starting poles or a model order is required",
                ))
            }
        }
        .map_err(to_py_err)?;

        Ok(Self { inner })
    }

    /// Run one fitting pass; call repeatedly to refine the poles
    pub fn fit(&mut self) -> PyResult<()> {
        self.inner.fit().map(|_| ()).map_err(to_py_err)
    }

    /// Current poles (starting poles before the first fit)
    #[getter]
    pub fn poles<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<Complex64>> {
        self.inner.poles().to_array().to_pyarray(py)
    }

    /// Fitted residues [Nc, N]
    #[getter]
    pub fn residues<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<Complex64>>> {
        Ok(self.model()?.residues().to_pyarray(py))
    }

    /// State-space matrix A [N, N]
    #[getter]
    pub fn a<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<Complex64>>> {
        Ok(self.model()?.a().to_pyarray(py))
    }

    /// State-space input vector B [N]
    #[getter]
    pub fn b<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray1<Complex64>>> {
        Ok(self.model()?.b().to_pyarray(py))
    }

    /// State-space output matrix C [Nc, N]
    #[getter]
    pub fn c<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<Complex64>>> {
        Ok(self.model()?.c().to_pyarray(py))
    }

    /// Constant coefficients D [Nc]
    #[getter]
    pub fn d<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray1<f64>>> {
        Ok(self.model()?.d().to_pyarray(py))
    }

    /// Proportional coefficients E [Nc]
    #[getter]
    pub fn e<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray1<f64>>> {
        Ok(self.model()?.e().to_pyarray(py))
    }

    /// Model order N
    #[getter]
    pub fn model_order(&self) -> usize {
        self.inner.poles().model_order()
    }

    /// Root mean square deviation of the fitted model from the samples
    pub fn rmse(&self) -> PyResult<f64> {
        self.inner.rmse().ok_or_else(not_fitted)
    }

    /// Largest absolute deviation of the fitted model from the samples
    pub fn max_deviation(&self) -> PyResult<f64> {
        self.inner.max_deviation().ok_or_else(not_fitted)
    }

    /// Model response at arbitrary complex frequencies
    ///
    /// Args:
    ///     s: Complex frequencies at which to evaluate
    ///
    /// Returns:
    ///     Complex responses as numpy array [len(s), Nc]
    pub fn fitted_response<'py>(
        &self,
        py: Python<'py>,
        s: Vec<Complex64>,
    ) -> PyResult<Bound<'py, PyArray2<Complex64>>> {
        Ok(self.model()?.responses(&s).to_pyarray(py))
    }

    fn __repr__(&self) -> String {
        match self.inner.model() {
            Some(model) => format!(
                "VectorFitting(order={}, channels={})",
                model.model_order(),
                model.n_channels()
            ),
            None => format!(
                "VectorFitting(order={}, not fitted)",
                self.inner.poles().model_order()
            ),
        }
    }
}
