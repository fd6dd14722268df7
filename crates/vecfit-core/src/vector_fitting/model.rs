//! Fitted model and response evaluation
//!
//! The model is evaluated from its complex residues:
//!   f(s) = sum_m c_m / (s - p_m) + d + s * e
//! which is independent of the realization stored in the state space.

use ndarray::{Array1, Array2, Axis};
use num_complex::Complex64;

use super::basis::reciprocal_basis;
use super::poles::PoleSet;
use super::samples::{Sample, SampleSet};
use super::state_space::StateSpace;

/// Result of one fitting pass
#[derive(Debug, Clone)]
pub struct Model {
    poles: PoleSet,
    /// Complex residues [Nc, N]
    residues: Array2<Complex64>,
    d: Array1<f64>,
    e: Array1<f64>,
    state_space: StateSpace,
}

impl Model {
    pub(crate) fn new(
        poles: PoleSet,
        residues: Array2<Complex64>,
        d: Array1<f64>,
        e: Array1<f64>,
        state_space: StateSpace,
    ) -> Self {
        Self {
            poles,
            residues,
            d,
            e,
            state_space,
        }
    }

    pub fn poles(&self) -> &PoleSet {
        &self.poles
    }

    pub fn residues(&self) -> &Array2<Complex64> {
        &self.residues
    }

    pub fn state_space(&self) -> &StateSpace {
        &self.state_space
    }

    pub fn a(&self) -> &Array2<Complex64> {
        &self.state_space.a
    }

    pub fn b(&self) -> &Array1<Complex64> {
        &self.state_space.b
    }

    pub fn c(&self) -> &Array2<Complex64> {
        &self.state_space.c
    }

    pub fn d(&self) -> &Array1<f64> {
        &self.d
    }

    pub fn e(&self) -> &Array1<f64> {
        &self.e
    }

    #[inline]
    pub fn model_order(&self) -> usize {
        self.poles.model_order()
    }

    #[inline]
    pub fn n_channels(&self) -> usize {
        self.residues.nrows()
    }

    /// Response of every channel at one complex frequency
    pub fn response(&self, s: Complex64) -> Array1<Complex64> {
        self.responses(&[s]).row(0).to_owned()
    }

    /// Responses at several complex frequencies, shape [len(s), Nc]
    pub fn responses(&self, s: &[Complex64]) -> Array2<Complex64> {
        let basis = reciprocal_basis(s, self.poles.poles());
        let mut out = basis.dot(&self.residues.t());
        for (mut row, &s_i) in out.axis_iter_mut(Axis(0)).zip(s.iter()) {
            for ((value, &d), &e) in row.iter_mut().zip(self.d.iter()).zip(self.e.iter()) {
                *value += s_i * e + d;
            }
        }
        out
    }

    /// Fitted samples at the frequencies of `samples`, in the same order
    pub fn fitted_samples(&self, samples: &SampleSet) -> Vec<Sample> {
        let s: Vec<Complex64> = samples.s().to_vec();
        self.fitted_samples_at(&s)
    }

    /// Fitted samples at arbitrary complex frequencies, in the given order
    pub fn fitted_samples_at(&self, s: &[Complex64]) -> Vec<Sample> {
        let responses = self.responses(s);
        s.iter()
            .zip(responses.axis_iter(Axis(0)))
            .map(|(&s_i, row)| Sample::new(s_i, row.to_owned()))
            .collect()
    }

    /// Root mean square deviation from the samples
    ///
    /// The squared deviations of all channels are summed and divided by `Ns^2`.
    pub fn rmse(&self, samples: &SampleSet) -> f64 {
        let n = samples.len() as f64;
        let sum: f64 = self
            .deviations(samples)
            .iter()
            .map(|diff| diff.norm_sqr())
            .sum();
        (sum / (n * n)).sqrt()
    }

    /// Largest absolute deviation from the samples over all channels
    pub fn max_deviation(&self, samples: &SampleSet) -> f64 {
        self.deviations(samples)
            .iter()
            .map(|diff| diff.norm())
            .fold(0.0, f64::max)
    }

    fn deviations(&self, samples: &SampleSet) -> Array2<Complex64> {
        let s: Vec<Complex64> = samples.s().to_vec();
        self.responses(&s) - samples.responses()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_fitting::state_space::assemble;
    use approx::assert_relative_eq;

    fn model_from(poles: Vec<Complex64>, residues: Vec<Complex64>, d: f64, e: f64) -> Model {
        let poles = PoleSet::new(poles).unwrap();
        let residues = Array2::from_shape_vec((1, residues.len()), residues).unwrap();
        let d = Array1::from_vec(vec![d]);
        let e = Array1::from_vec(vec![e]);
        let ss = assemble(&poles, &residues, &d, &e, false);
        Model::new(poles, residues, d, e, ss)
    }

    #[test]
    fn test_response_constant_and_proportional() {
        let model = model_from(vec![Complex64::new(-1.0, 0.0)], vec![Complex64::new(0.0, 0.0)], 0.5, 2.0);

        let y = model.response(Complex64::new(0.0, 3.0));
        assert_relative_eq!(y[0].re, 0.5, epsilon = 1e-12);
        assert_relative_eq!(y[0].im, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_response_single_real_pole() {
        // At s = 0: 1e9 / (0 - (-1e9)) = 1
        let model = model_from(vec![Complex64::new(-1e9, 0.0)], vec![Complex64::new(1e9, 0.0)], 0.0, 0.0);

        let y = model.response(Complex64::new(0.0, 0.0));
        assert_relative_eq!(y[0].re, 1.0, epsilon = 1e-10);
        assert_relative_eq!(y[0].im, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_response_matches_state_space() {
        let p = Complex64::new(-2.0, 7.0);
        let r = Complex64::new(1.5, 0.5);
        let model = model_from(vec![p, p.conj()], vec![r, r.conj()], 0.2, 0.0);

        for w in [0.0, 1.0, 7.0, 30.0] {
            let s = Complex64::new(0.0, w);
            let direct = model.response(s);
            let realized = model.state_space().response(s);
            assert_relative_eq!(direct[0].re, realized[0].re, epsilon = 1e-12);
            assert_relative_eq!(direct[0].im, realized[0].im, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rmse_divides_by_squared_sample_count() {
        let model = model_from(vec![Complex64::new(-1.0, 0.0)], vec![Complex64::new(0.0, 0.0)], 1.0, 0.0);
        let samples = SampleSet::new(
            vec![
                Sample::new(Complex64::new(0.0, 1.0), vec![Complex64::new(1.1, 0.0)]),
                Sample::new(Complex64::new(0.0, 2.0), vec![Complex64::new(1.1, 0.0)]),
                Sample::new(Complex64::new(0.0, 3.0), vec![Complex64::new(1.1, 0.0)]),
            ],
            None,
        )
        .unwrap();

        // sqrt(3 * 0.01 / 9)
        assert_relative_eq!(model.rmse(&samples), (0.03f64 / 9.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(model.max_deviation(&samples), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_fitted_samples_at_keeps_order() {
        let model = model_from(vec![Complex64::new(-1.0, 0.0)], vec![Complex64::new(1.0, 0.0)], 0.0, 0.0);
        let s = [Complex64::new(0.0, 5.0), Complex64::new(0.0, 1.0)];

        let fitted = model.fitted_samples_at(&s);
        assert_eq!(fitted.len(), 2);
        assert_eq!(fitted[0].s, s[0]);
        assert_eq!(fitted[1].s, s[1]);
        assert_eq!(fitted[0].values.len(), 1);
    }
}
