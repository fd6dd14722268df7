//! Residue identification with known poles

use ndarray::{s, Array1, Array2};
use num_complex::Complex64;

use super::basis::{design_matrix, put_stacked, recombine_pairs};
use super::error::FitError;
use super::options::AsymptoticTrend;
use super::poles::PoleSet;
use super::samples::SampleSet;
use crate::math::linalg;

/// Residues and asymptotic coefficients of every channel
#[derive(Debug, Clone)]
pub struct ResidueResult {
    /// Complex residues [Nc, N]; conjugate pairs hold conjugate residues
    pub residues: Array2<Complex64>,
    /// Constant coefficients [Nc]
    pub d: Array1<f64>,
    /// Proportional coefficients [Nc]
    pub e: Array1<f64>,
}

/// Fit residues using least squares
///
/// Each channel is an independent real-stacked weighted problem over the
/// pole basis plus the trend columns.
pub fn identify_residues(
    samples: &SampleSet,
    poles: &PoleSet,
    trend: AsymptoticTrend,
) -> Result<ResidueResult, FitError> {
    let n_samples = samples.len();
    let n_channels = samples.n_channels();
    let n_poles = poles.len();

    let dk = design_matrix(samples.s(), poles, trend);
    let n_cols = dk.ncols();

    let mut residues = Array2::<Complex64>::zeros((n_channels, n_poles));
    let mut d = Array1::<f64>::zeros(n_channels);
    let mut e = Array1::<f64>::zeros(n_channels);

    for ch in 0..n_channels {
        let f = samples.channel(ch);
        let w = samples.weights().column(ch);

        let mut a = Array2::<f64>::zeros((2 * n_samples, n_cols));
        let mut b = Array1::<f64>::zeros(2 * n_samples);
        for i in 0..n_samples {
            for m in 0..n_cols {
                put_stacked(&mut a, n_samples, i, m, dk[[i, m]] * w[i]);
            }
            b[i] = f[i].re * w[i];
            b[i + n_samples] = f[i].im * w[i];
        }

        let result = linalg::lstsq_qr_scaled(&a, &b)?;
        let x = result.solution;

        residues
            .row_mut(ch)
            .assign(&recombine_pairs(x.slice(s![..n_poles]), poles.kinds()));

        match trend {
            AsymptoticTrend::Zero => {}
            AsymptoticTrend::Constant => d[ch] = x[n_poles],
            AsymptoticTrend::Linear => {
                d[ch] = x[n_poles];
                e[ch] = x[n_poles + 1];
            }
        }
    }

    log::debug!(
        "identified residues for {} channels over {} poles",
        n_channels,
        n_poles
    );

    Ok(ResidueResult { residues, d, e })
}
