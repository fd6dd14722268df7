//! Pole relocation
//!
//! Identifies a scaling function `sigma(s) = sum_m c_m / (s - p_m) + d` such
//! that `sigma * f` is well described by a rational function with the same
//! poles, then returns the zeros of `sigma` as the relocated poles. Each
//! channel's system is reduced with a QR factorization down to the block of
//! unknowns shared by all channels before the final solve.

use ndarray::{s, Array1, Array2, ArrayView1};
use num_complex::Complex64;

use super::basis::{design_matrix, put_stacked};
use super::constants::{RELAX_TOLERANCE_HIGH, RELAX_TOLERANCE_LOW};
use super::error::{FitError, NumericalConsistencyError};
use super::options::{AsymptoticTrend, Options};
use super::poles::{PoleKind, PoleSet};
use super::samples::SampleSet;
use crate::constants::REAL_VALUE_TOL;
use crate::math::linalg;

/// Result of one pole relocation
#[derive(Debug, Clone)]
pub struct PoleRelocationResult {
    pub poles: PoleSet,
    /// Constant term of the scaling function actually used
    pub d_sigma: f64,
    /// Whether the constant term was pinned instead of identified
    pub pinned: bool,
}

/// Relocate poles from the sampled responses
pub fn relocate_poles(
    samples: &SampleSet,
    poles: &PoleSet,
    options: &Options,
) -> Result<PoleRelocationResult, FitError> {
    let n_poles = poles.len();
    let basis = design_matrix(samples.s(), poles, options.asymptotic_trend);
    let sigma_basis = design_matrix(samples.s(), poles, AsymptoticTrend::Constant);

    let relaxed = if options.relax {
        Some(solve_relaxed(samples, &basis, &sigma_basis)?)
    } else {
        None
    };

    let (x, pinned) = match relaxed {
        Some(x) if (RELAX_TOLERANCE_LOW..=RELAX_TOLERANCE_HIGH).contains(&x[n_poles].abs()) => {
            (x, false)
        }
        relaxed => {
            let d_new = match relaxed {
                None => 1.0,
                Some(x) => pinned_constant(x[n_poles])?,
            };
            if options.relax {
                log::warn!("relaxed scaling function is degenerate, pinning d = {:e}", d_new);
            }
            (solve_pinned(samples, &basis, &sigma_basis, d_new)?, true)
        }
    };

    let d_sigma = x[n_poles];
    log::debug!("scaling function constant d = {:e} (pinned: {})", d_sigma, pinned);

    let relocated = scaling_function_zeros(poles, &x, options.stable)?;
    log::trace!("relocated poles: {:?}", relocated.poles());

    Ok(PoleRelocationResult {
        poles: relocated,
        d_sigma,
        pinned,
    })
}

/// Replacement for a relaxed constant term outside the tolerance bounds
///
/// Zero maps to 1; a tiny or huge value maps to the bound it crossed, keeping
/// its sign. Anything else (a NaN, for instance) can not be relaxed.
fn pinned_constant(d: f64) -> Result<f64, NumericalConsistencyError> {
    let magnitude = d.abs();
    if magnitude < f64::MIN_POSITIVE {
        Ok(1.0)
    } else if magnitude < RELAX_TOLERANCE_LOW {
        Ok(d.signum() * RELAX_TOLERANCE_LOW)
    } else if magnitude > RELAX_TOLERANCE_HIGH {
        Ok(d.signum() * RELAX_TOLERANCE_HIGH)
    } else {
        Err(NumericalConsistencyError::CannotRelaxConstantTerm(d))
    }
}

/// Relaxed identification: `N + 1` unknowns including the constant term
fn solve_relaxed(
    samples: &SampleSet,
    basis: &Array2<Complex64>,
    sigma_basis: &Array2<Complex64>,
) -> Result<Array1<f64>, FitError> {
    let n_samples = samples.len();
    let n_channels = samples.n_channels();
    let n_left = basis.ncols();
    let n_sigma = sigma_basis.ncols();
    let weights = samples.weights();

    // Scaling for the non-triviality row
    let scale = samples
        .responses()
        .iter()
        .zip(weights.iter())
        .map(|(f, w)| (*f * *w).norm_sqr())
        .sum::<f64>()
        .sqrt()
        / n_samples as f64;

    let mut aa = Array2::<f64>::zeros((n_channels * n_sigma, n_sigma));
    let mut bb = Array1::<f64>::zeros(n_channels * n_sigma);

    for ch in 0..n_channels {
        let f = samples.channel(ch);
        let w = weights.column(ch);
        let last = ch == n_channels - 1;

        let mut a = Array2::<f64>::zeros((2 * n_samples + 1, n_left + n_sigma));
        for i in 0..n_samples {
            for m in 0..n_left {
                put_stacked(&mut a, n_samples, i, m, basis[[i, m]] * w[i]);
            }
            for m in 0..n_sigma {
                put_stacked(&mut a, n_samples, i, n_left + m, -sigma_basis[[i, m]] * f[i] * w[i]);
            }
        }

        // Integral criterion for sigma
        if last {
            for m in 0..n_sigma {
                a[[2 * n_samples, n_left + m]] = (sigma_basis.column(m).sum() * scale).re;
            }
        }

        let (q, r) = linalg::qr_thin(&a)?;
        aa.slice_mut(s![ch * n_sigma..(ch + 1) * n_sigma, ..])
            .assign(&r.slice(s![n_left.., n_left..]));

        if last {
            for i in 0..n_sigma {
                bb[ch * n_sigma + i] = q[[2 * n_samples, n_left + i]] * n_samples as f64 * scale;
            }
        }
    }

    let result = linalg::lstsq_qr_scaled(&aa, &bb)?;
    log::debug!(
        "relaxed pole identification: {} equations, condition ~ {:e}",
        aa.nrows(),
        result.condition
    );
    Ok(result.solution)
}

/// Identification with the constant term fixed to `d_new`: `N` unknowns
fn solve_pinned(
    samples: &SampleSet,
    basis: &Array2<Complex64>,
    sigma_basis: &Array2<Complex64>,
    d_new: f64,
) -> Result<Array1<f64>, FitError> {
    let n_samples = samples.len();
    let n_channels = samples.n_channels();
    let n_left = basis.ncols();
    let n_poles = sigma_basis.ncols() - 1;
    let weights = samples.weights();

    let mut aa = Array2::<f64>::zeros((n_channels * n_poles, n_poles));
    let mut bb = Array1::<f64>::zeros(n_channels * n_poles);

    for ch in 0..n_channels {
        let f = samples.channel(ch);
        let w = weights.column(ch);

        let mut a = Array2::<f64>::zeros((2 * n_samples, n_left + n_poles));
        let mut b = Array1::<f64>::zeros(2 * n_samples);
        for i in 0..n_samples {
            for m in 0..n_left {
                put_stacked(&mut a, n_samples, i, m, basis[[i, m]] * w[i]);
            }
            for m in 0..n_poles {
                put_stacked(&mut a, n_samples, i, n_left + m, -sigma_basis[[i, m]] * f[i] * w[i]);
            }
            let rhs = f[i] * (d_new * w[i]);
            b[i] = rhs.re;
            b[i + n_samples] = rhs.im;
        }

        let (q, r) = linalg::qr_thin(&a)?;
        let block = ch * n_poles..(ch + 1) * n_poles;
        aa.slice_mut(s![block.clone(), ..])
            .assign(&r.slice(s![n_left.., n_left..]));
        bb.slice_mut(s![block])
            .assign(&q.slice(s![.., n_left..]).t().dot(&b));
    }

    let result = linalg::lstsq_qr_scaled(&aa, &bb)?;
    log::debug!(
        "pinned pole identification: {} equations, condition ~ {:e}",
        aa.nrows(),
        result.condition
    );

    let mut x = Array1::<f64>::zeros(n_poles + 1);
    x.slice_mut(s![..n_poles]).assign(&result.solution);
    x[n_poles] = d_new;
    Ok(x)
}

/// Zeros of the scaling function: eigenvalues of `Lambda - b c^T / d`
fn scaling_function_zeros(
    poles: &PoleSet,
    x: &Array1<f64>,
    stable: bool,
) -> Result<PoleSet, FitError> {
    let n = poles.len();
    let zer = correction_matrix(poles.poles(), poles.kinds(), x.slice(s![..n]), x[n])?;
    let mut roots = linalg::eigenvalues(&zer)?;

    if stable {
        for root in roots.iter_mut().filter(|r| r.re > 0.0) {
            let re = root.re;
            *root -= 2.0 * re;
        }
    }

    PoleSet::from_roots(&roots).ok_or_else(|| {
        let upper = roots.iter().filter(|r| r.im > 0.0).count();
        let lower = roots.iter().filter(|r| r.im < 0.0).count();
        NumericalConsistencyError::UnpairedEigenvalues { upper, lower }.into()
    })
}

/// Real matrix `Lambda - b c^T / d`
///
/// Conjugate pairs enter `Lambda` as real 2x2 blocks `[[a1, a2], [-a2, a1]]`
/// with `b = (2, 0)`, and `c` carries their real coefficients `(r1, r2)`
/// as they are. A pole tagged real must have no imaginary part.
fn correction_matrix(
    poles: &[Complex64],
    kinds: &[PoleKind],
    c: ArrayView1<'_, f64>,
    d: f64,
) -> Result<Array2<f64>, NumericalConsistencyError> {
    let n = poles.len();
    let mut lambda = Array2::<f64>::zeros((n, n));
    let mut b = Array1::<f64>::ones(n);

    for (m, (&pole, kind)) in poles.iter().zip(kinds).enumerate() {
        match kind {
            PoleKind::Real => {
                if !is_real_value(pole) {
                    return Err(NumericalConsistencyError::NonRealPoleMatrix {
                        row: m,
                        col: m,
                        imag: pole.im,
                    });
                }
                lambda[[m, m]] = pole.re;
            }
            PoleKind::ConjugatePrimary => {
                lambda[[m, m]] = pole.re;
                lambda[[m, m + 1]] = pole.im;
                lambda[[m + 1, m]] = -pole.im;
                lambda[[m + 1, m + 1]] = pole.re;
                b[m] = 2.0;
                b[m + 1] = 0.0;
            }
            PoleKind::ConjugateSecondary => {}
        }
    }

    Ok(Array2::from_shape_fn((n, n), |(i, j)| {
        lambda[[i, j]] - b[i] * c[j] / d
    }))
}

#[inline]
fn is_real_value(value: Complex64) -> bool {
    value.im.abs() <= REAL_VALUE_TOL * value.norm().max(1.0)
}
