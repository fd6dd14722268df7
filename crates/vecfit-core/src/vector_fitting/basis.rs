//! Partial-fraction basis shared by the solvers and the evaluator

use ndarray::{Array1, Array2, ArrayView1};
use num_complex::Complex64;

use super::options::AsymptoticTrend;
use super::poles::{PoleKind, PoleSet};

/// Build the real-coefficient design matrix `[Ns, N + trend terms]`
///
/// Real poles contribute `1 / (s - p)`. A conjugate pair contributes
/// `1/(s-p) + 1/(s-p*)` in its primary column and `j/(s-p) - j/(s-p*)` in its
/// secondary column, so that real coefficients `(r1, r2)` describe the
/// residues `r1 + j r2` and `r1 - j r2`. Trend columns (`1`, then `s`) follow.
pub fn design_matrix(
    s: &Array1<Complex64>,
    poles: &PoleSet,
    trend: AsymptoticTrend,
) -> Array2<Complex64> {
    let n_samples = s.len();
    let n_poles = poles.len();
    let one = Complex64::new(1.0, 0.0);
    let mut dk = Array2::<Complex64>::zeros((n_samples, n_poles + trend.n_terms()));

    for (m, (pole, kind)) in poles.iter().enumerate() {
        match kind {
            PoleKind::Real => {
                for (i, &s_i) in s.iter().enumerate() {
                    dk[[i, m]] = one / (s_i - pole);
                }
            }
            PoleKind::ConjugatePrimary => {
                for (i, &s_i) in s.iter().enumerate() {
                    let term1 = one / (s_i - pole);
                    let term2 = one / (s_i - pole.conj());
                    dk[[i, m]] = term1 + term2;
                    dk[[i, m + 1]] = Complex64::i() * (term1 - term2);
                }
            }
            // Filled together with its primary
            PoleKind::ConjugateSecondary => {}
        }
    }

    match trend {
        AsymptoticTrend::Zero => {}
        AsymptoticTrend::Constant => dk.column_mut(n_poles).fill(one),
        AsymptoticTrend::Linear => {
            dk.column_mut(n_poles).fill(one);
            dk.column_mut(n_poles + 1).assign(s);
        }
    }

    dk
}

/// Plain reciprocal basis `1 / (s_i - p_m)` of shape `[len(s), N]`
pub fn reciprocal_basis(s: &[Complex64], poles: &[Complex64]) -> Array2<Complex64> {
    let one = Complex64::new(1.0, 0.0);
    Array2::from_shape_fn((s.len(), poles.len()), |(i, m)| one / (s[i] - poles[m]))
}

/// Turn real pair coefficients `(r1, r2)` into conjugate values `r1 +/- j r2`
///
/// Coefficients of real poles are returned unchanged.
pub fn recombine_pairs(x: ArrayView1<'_, f64>, kinds: &[PoleKind]) -> Array1<Complex64> {
    let mut out = x.mapv(|v| Complex64::new(v, 0.0));
    for (m, kind) in kinds.iter().enumerate() {
        if *kind == PoleKind::ConjugatePrimary {
            let (r1, r2) = (x[m], x[m + 1]);
            out[m] = Complex64::new(r1, r2);
            out[m + 1] = Complex64::new(r1, -r2);
        }
    }
    out
}

/// Write `value` into the stacked real system: real part at `row`, imaginary part at `row + n_samples`
#[inline]
pub fn put_stacked(a: &mut Array2<f64>, n_samples: usize, row: usize, col: usize, value: Complex64) {
    a[[row, col]] = value.re;
    a[[row + n_samples, col]] = value.im;
}
