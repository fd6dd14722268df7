//! Sampled frequency responses
//!
//! A [`SampleSet`] holds `Ns` complex frequencies, the `Ns x Nc` responses
//! measured at them and one weight per (sample, channel) pair. Samples are
//! sorted by ascending `Im(s)` once, at construction.

use ndarray::{Array1, Array2, ArrayView1};
use num_complex::Complex64;
use std::f64::consts::PI;

use super::error::{FitError, InputValidationError};

/// One sample: complex frequency `s` and the response of every channel
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub s: Complex64,
    pub values: Array1<Complex64>,
}

impl Sample {
    pub fn new(s: Complex64, values: impl Into<Array1<Complex64>>) -> Self {
        Self {
            s,
            values: values.into(),
        }
    }

    /// Build a sample at `s = j * 2 * pi * f` from a frequency in Hz
    pub fn from_frequency(freq: f64, values: impl Into<Array1<Complex64>>) -> Self {
        Self::new(Complex64::new(0.0, 2.0 * PI * freq), values)
    }
}

/// Validated, sorted sample set with its weight matrix
#[derive(Debug, Clone)]
pub struct SampleSet {
    /// Complex frequencies [Ns]
    s: Array1<Complex64>,
    /// Responses [Ns, Nc]
    responses: Array2<Complex64>,
    /// Weights [Ns, Nc]
    weights: Array2<f64>,
}

impl SampleSet {
    /// Validate and sort samples
    ///
    /// # Arguments
    /// * `samples` - Samples in any order; every one must carry the same number of channels
    /// * `weights` - Optional `[Ns, Nc]` weights, rows in the same order as `samples`.
    ///   Defaults to all ones.
    pub fn new(samples: Vec<Sample>, weights: Option<Array2<f64>>) -> Result<Self, FitError> {
        let n_samples = samples.len();
        let n_channels = samples
            .first()
            .map(|sample| sample.values.len())
            .ok_or(InputValidationError::EmptySamples)?;

        if n_channels == 0 {
            return Err(InputValidationError::NoResponseChannels.into());
        }

        for (index, sample) in samples.iter().enumerate() {
            if sample.values.len() != n_channels {
                return Err(InputValidationError::ChannelCountMismatch {
                    index,
                    expected: n_channels,
                    found: sample.values.len(),
                }
                .into());
            }
            let finite = sample.s.is_finite() && sample.values.iter().all(|v| v.is_finite());
            if !finite {
                return Err(InputValidationError::NonFiniteSample { index }.into());
            }
        }

        let weights = match weights {
            Some(w) if w.dim() != (n_samples, n_channels) => {
                return Err(InputValidationError::WeightShape {
                    expected: (n_samples, n_channels),
                    found: w.dim(),
                }
                .into());
            }
            Some(w) => w,
            None => Array2::ones((n_samples, n_channels)),
        };

        // Stable sort keeps duplicates in caller order
        let mut order: Vec<usize> = (0..n_samples).collect();
        order.sort_by(|&a, &b| samples[a].s.im.total_cmp(&samples[b].s.im));

        let s = order.iter().map(|&i| samples[i].s).collect();
        let responses =
            Array2::from_shape_fn((n_samples, n_channels), |(i, n)| samples[order[i]].values[n]);
        let weights = Array2::from_shape_fn((n_samples, n_channels), |(i, n)| weights[[order[i], n]]);

        Ok(Self {
            s,
            responses,
            weights,
        })
    }

    /// Number of samples (Ns)
    #[inline]
    pub fn len(&self) -> usize {
        self.s.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.s.is_empty()
    }

    /// Number of response channels (Nc)
    #[inline]
    pub fn n_channels(&self) -> usize {
        self.responses.ncols()
    }

    /// Sorted complex frequencies
    #[inline]
    pub fn s(&self) -> &Array1<Complex64> {
        &self.s
    }

    /// Responses [Ns, Nc], rows in sorted order
    #[inline]
    pub fn responses(&self) -> &Array2<Complex64> {
        &self.responses
    }

    /// Weights [Ns, Nc], rows in sorted order
    #[inline]
    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    /// Response of one channel across all samples
    #[inline]
    pub fn channel(&self, n: usize) -> ArrayView1<'_, Complex64> {
        self.responses.column(n)
    }

    /// Samples in sorted order
    pub fn to_samples(&self) -> Vec<Sample> {
        self.s
            .iter()
            .zip(self.responses.rows())
            .map(|(&s, row)| Sample::new(s, row.to_owned()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(w: f64, values: Vec<Complex64>) -> Sample {
        Sample::new(Complex64::new(0.0, w), values)
    }

    #[test]
    fn test_samples_sorted_by_frequency() {
        let samples = vec![
            sample(10.0, vec![Complex64::new(3.0, 0.0)]),
            sample(0.1, vec![Complex64::new(1.0, 0.0)]),
            sample(1.0, vec![Complex64::new(2.0, 0.0)]),
        ];
        let weights = Array2::from_shape_vec((3, 1), vec![30.0, 10.0, 20.0]).unwrap();

        let set = SampleSet::new(samples, Some(weights)).unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(set.n_channels(), 1);
        assert_eq!(set.s()[0].im, 0.1);
        assert_eq!(set.s()[2].im, 10.0);
        assert_eq!(set.responses()[[0, 0]].re, 1.0);
        assert_eq!(set.responses()[[2, 0]].re, 3.0);
        // Weights travel with their samples
        assert_eq!(set.weights()[[0, 0]], 10.0);
        assert_eq!(set.weights()[[2, 0]], 30.0);
    }

    #[test]
    fn test_default_weights_are_ones() {
        let samples = vec![sample(1.0, vec![Complex64::new(1.0, 0.0); 2])];
        let set = SampleSet::new(samples, None).unwrap();
        assert_eq!(set.weights().dim(), (1, 2));
        assert!(set.weights().iter().all(|&w| w == 1.0));
    }

    #[test]
    fn test_from_frequency() {
        let s = Sample::from_frequency(1.0, vec![Complex64::new(0.0, 0.0)]);
        assert_eq!(s.s.re, 0.0);
        assert!((s.s.im - 2.0 * PI).abs() < 1e-15);
    }

    #[test]
    fn test_empty_samples_rejected() {
        let err = SampleSet::new(Vec::new(), None).unwrap_err();
        assert_eq!(err, FitError::from(InputValidationError::EmptySamples));
    }

    #[test]
    fn test_zero_channels_rejected() {
        let err = SampleSet::new(vec![sample(1.0, Vec::new())], None).unwrap_err();
        assert_eq!(err, FitError::from(InputValidationError::NoResponseChannels));
    }

    #[test]
    fn test_channel_mismatch_rejected() {
        let samples = vec![
            sample(1.0, vec![Complex64::new(1.0, 0.0)]),
            sample(2.0, vec![Complex64::new(1.0, 0.0); 2]),
        ];
        let err = SampleSet::new(samples, None).unwrap_err();
        assert!(matches!(
            err,
            FitError::InputValidation(InputValidationError::ChannelCountMismatch { index: 1, .. })
        ));
    }

    #[test]
    fn test_weight_shape_rejected() {
        let samples = vec![
            sample(1.0, vec![Complex64::new(1.0, 0.0)]),
            sample(2.0, vec![Complex64::new(1.0, 0.0)]),
        ];
        let err = SampleSet::new(samples, Some(Array2::ones((3, 1)))).unwrap_err();
        assert_eq!(
            err,
            FitError::from(InputValidationError::WeightShape {
                expected: (2, 1),
                found: (3, 1)
            })
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let samples = vec![sample(1.0, vec![Complex64::new(f64::NAN, 0.0)])];
        assert!(SampleSet::new(samples, None).is_err());
    }
}
