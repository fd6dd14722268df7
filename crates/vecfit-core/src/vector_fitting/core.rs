//! Core VectorFitting struct and main fitting routine

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use super::error::FitError;
use super::init::{starting_poles, PoleSpacing};
use super::model::Model;
use super::options::Options;
use super::poles::PoleSet;
use super::relocation::relocate_poles;
use super::residues::{identify_residues, ResidueResult};
use super::samples::{Sample, SampleSet};
use super::state_space::assemble;

/// Run one Vector Fitting pass
///
/// Relocates the poles (unless skipped), identifies residues and trend
/// coefficients on the resulting poles (unless skipped) and assembles the
/// state-space realization.
pub fn fit(samples: &SampleSet, poles: &PoleSet, options: &Options) -> Result<Model, FitError> {
    log::debug!(
        "vector fitting pass: order {}, {} samples, {} channels",
        poles.model_order(),
        samples.len(),
        samples.n_channels()
    );

    let poles = if options.skip_pole_identification {
        poles.clone()
    } else {
        relocate_poles(samples, poles, options)?.poles
    };

    let ResidueResult { residues, d, e } = if options.skip_residue_identification {
        ResidueResult {
            residues: Array2::zeros((samples.n_channels(), poles.len())),
            d: Array1::zeros(samples.n_channels()),
            e: Array1::zeros(samples.n_channels()),
        }
    } else {
        identify_residues(samples, &poles, options.asymptotic_trend)?
    };

    let state_space = assemble(&poles, &residues, &d, &e, options.complex_state_space);

    Ok(Model::new(poles, residues, d, e, state_space))
}

/// Vector Fitting engine
///
/// Holds the samples, the current poles and the model of the last
/// successful [`fit`](VectorFitting::fit). Every successful fit replaces the
/// current poles with the relocated ones, so calling `fit` repeatedly
/// iterates the relocation.
#[derive(Debug, Clone)]
pub struct VectorFitting {
    samples: SampleSet,
    poles: PoleSet,
    options: Options,
    model: Option<Model>,
}

impl VectorFitting {
    /// Create an engine from samples and starting poles
    pub fn new(samples: Vec<Sample>, poles: Vec<Complex64>, options: Options) -> Result<Self, FitError> {
        Self::with_weights(samples, poles, None, options)
    }

    /// Create an engine with per-sample, per-channel weights `[Ns, Nc]`
    pub fn with_weights(
        samples: Vec<Sample>,
        poles: Vec<Complex64>,
        weights: Option<Array2<f64>>,
        options: Options,
    ) -> Result<Self, FitError> {
        let poles = PoleSet::new(poles)?;
        let samples = SampleSet::new(samples, weights)?;
        Ok(Self::from_parts(samples, poles, options))
    }

    /// Create an engine with generated starting poles of the given order
    pub fn with_order(
        samples: Vec<Sample>,
        order: usize,
        spacing: PoleSpacing,
        weights: Option<Array2<f64>>,
        options: Options,
    ) -> Result<Self, FitError> {
        let samples = SampleSet::new(samples, weights)?;
        let poles = starting_poles(&samples, order, spacing)?;
        Ok(Self::from_parts(samples, poles, options))
    }

    /// Create an engine from an already validated sample set and pole set
    pub fn from_parts(samples: SampleSet, poles: PoleSet, options: Options) -> Self {
        Self {
            samples,
            poles,
            options,
            model: None,
        }
    }

    /// Run one fitting pass on the current poles
    ///
    /// On failure the previous model is discarded and the poles are kept.
    pub fn fit(&mut self) -> Result<&Model, FitError> {
        self.model = None;
        let model = fit(&self.samples, &self.poles, &self.options)?;
        self.poles = model.poles().clone();
        Ok(&*self.model.insert(model))
    }

    /// Current poles: the starting poles, or those of the last successful fit
    pub fn poles(&self) -> &PoleSet {
        &self.poles
    }

    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    /// Model of the last successful fit
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn a(&self) -> Option<&Array2<Complex64>> {
        self.model.as_ref().map(Model::a)
    }

    pub fn b(&self) -> Option<&Array1<Complex64>> {
        self.model.as_ref().map(Model::b)
    }

    pub fn c(&self) -> Option<&Array2<Complex64>> {
        self.model.as_ref().map(Model::c)
    }

    pub fn d(&self) -> Option<&Array1<f64>> {
        self.model.as_ref().map(Model::d)
    }

    pub fn e(&self) -> Option<&Array1<f64>> {
        self.model.as_ref().map(Model::e)
    }

    /// Model response of every channel at `s`
    pub fn predict_response(&self, s: Complex64) -> Option<Array1<Complex64>> {
        self.model.as_ref().map(|m| m.response(s))
    }

    /// Fitted samples at the sampled frequencies, in sorted order
    pub fn fitted_samples(&self) -> Option<Vec<Sample>> {
        self.model.as_ref().map(|m| m.fitted_samples(&self.samples))
    }

    /// Fitted samples at arbitrary frequencies, in the given order
    pub fn fitted_samples_at(&self, s: &[Complex64]) -> Option<Vec<Sample>> {
        self.model.as_ref().map(|m| m.fitted_samples_at(s))
    }

    pub fn rmse(&self) -> Option<f64> {
        self.model.as_ref().map(|m| m.rmse(&self.samples))
    }

    pub fn max_deviation(&self) -> Option<f64> {
        self.model.as_ref().map(|m| m.max_deviation(&self.samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_fitting::error::InputValidationError;
    use crate::vector_fitting::options::AsymptoticTrend;
    use approx::assert_relative_eq;

    fn single_pole_samples() -> Vec<Sample> {
        [0.1, 1.0, 10.0]
            .iter()
            .map(|&w| {
                let s = Complex64::new(0.0, w);
                Sample::new(s, vec![Complex64::new(2.0, 0.0) / (s + 1.0)])
            })
            .collect()
    }

    #[test]
    fn test_fit_before_fit_is_empty() {
        let vf = VectorFitting::new(
            single_pole_samples(),
            vec![Complex64::new(-2.0, 0.0)],
            Options::default(),
        )
        .unwrap();

        assert!(vf.model().is_none());
        assert!(vf.rmse().is_none());
        assert!(vf.predict_response(Complex64::new(0.0, 1.0)).is_none());
    }

    #[test]
    fn test_fit_skip_poles_keeps_starting_poles() {
        let options = Options::default()
            .with_skip_pole_identification(true)
            .with_asymptotic_trend(AsymptoticTrend::Zero);
        let mut vf = VectorFitting::new(single_pole_samples(), vec![Complex64::new(-1.0, 0.0)], options).unwrap();

        let model = vf.fit().unwrap();
        assert_eq!(model.poles().poles()[0], Complex64::new(-1.0, 0.0));
        assert_relative_eq!(model.residues()[[0, 0]].re, 2.0, epsilon = 1e-9);
        assert!(vf.rmse().unwrap() < 1e-9);
    }

    #[test]
    fn test_fit_skip_residues_gives_pole_only_model() {
        let options = Options::default().with_skip_residue_identification(true);
        let mut vf = VectorFitting::new(single_pole_samples(), vec![Complex64::new(-3.0, 0.0)], options).unwrap();

        vf.fit().unwrap();
        assert!(vf.c().unwrap().iter().all(|c| c.norm() == 0.0));
        assert!(vf.d().unwrap().iter().all(|&d| d == 0.0));
        assert!(vf.e().unwrap().iter().all(|&e| e == 0.0));
        assert_eq!(vf.b().unwrap()[0], Complex64::new(1.0, 0.0));
    }

    #[test]
    fn test_fit_updates_current_poles() {
        let mut vf = VectorFitting::new(
            single_pole_samples(),
            vec![Complex64::new(-5.0, 0.0)],
            Options::default().with_asymptotic_trend(AsymptoticTrend::Zero),
        )
        .unwrap();

        vf.fit().unwrap();
        assert_relative_eq!(vf.poles().poles()[0].re, -1.0, epsilon = 1e-6);
        assert_eq!(vf.poles(), vf.model().unwrap().poles());
    }

    #[test]
    fn test_with_order_zero() {
        let err = VectorFitting::with_order(
            single_pole_samples(),
            0,
            PoleSpacing::Logarithmic,
            None,
            Options::default(),
        )
        .unwrap_err();
        assert_eq!(err, FitError::from(InputValidationError::ZeroOrder));
    }
}
