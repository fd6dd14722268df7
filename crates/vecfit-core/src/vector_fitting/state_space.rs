//! State-space realization of a pole-residue model
//!
//! The realization is:
//!   x' = A * x + B * u
//!   y  = C * x + D * u + s * E * u
//!
//! with a single input `u` and one output per response channel.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use super::poles::{PoleKind, PoleSet};

/// Form of the A, B, C matrices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Realization {
    /// Diagonal complex A
    Complex,
    /// Real 2x2 blocks for conjugate pairs, all entries real
    Real,
}

/// State-space matrices (A, B, C, D, E)
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpace {
    /// System matrix A [N, N]
    pub a: Array2<Complex64>,
    /// Input vector B [N]
    pub b: Array1<Complex64>,
    /// Output matrix C [Nc, N]
    pub c: Array2<Complex64>,
    /// Feedthrough vector D [Nc]
    pub d: Array1<f64>,
    /// Proportional vector E [Nc]
    pub e: Array1<f64>,
    pub realization: Realization,
}

/// Real-valued copy of a [`Realization::Real`] state space
#[derive(Debug, Clone, PartialEq)]
pub struct RealStateSpace {
    pub a: Array2<f64>,
    pub b: Array1<f64>,
    pub c: Array2<f64>,
    pub d: Array1<f64>,
    pub e: Array1<f64>,
}

/// Assemble the state space from poles and residues
///
/// `A` is diagonal in the poles and `B` is all ones. Unless `complex` is
/// requested, every conjugate pair `p = a1 + j a2` is rewritten as the real
/// block `[[a1, a2], [-a2, a1]]`, its residue column split into real and
/// imaginary parts, and its `B` entries set to `(2 Re b, -2 Im b)`.
pub fn assemble(
    poles: &PoleSet,
    residues: &Array2<Complex64>,
    d: &Array1<f64>,
    e: &Array1<f64>,
    complex: bool,
) -> StateSpace {
    let n = poles.len();
    let n_channels = residues.nrows();

    let mut a = Array2::<Complex64>::zeros((n, n));
    for (m, &pole) in poles.poles().iter().enumerate() {
        a[[m, m]] = pole;
    }
    let mut b = Array1::<Complex64>::ones(n);
    let mut c = residues.clone();

    if complex {
        return StateSpace {
            a,
            b,
            c,
            d: d.clone(),
            e: e.clone(),
            realization: Realization::Complex,
        };
    }

    for (m, kind) in poles.kinds().iter().enumerate() {
        if *kind != PoleKind::ConjugatePrimary {
            continue;
        }
        let a1 = a[[m, m]].re;
        let a2 = a[[m, m]].im;
        a[[m, m]] = Complex64::new(a1, 0.0);
        a[[m, m + 1]] = Complex64::new(a2, 0.0);
        a[[m + 1, m]] = Complex64::new(-a2, 0.0);
        a[[m + 1, m + 1]] = Complex64::new(a1, 0.0);

        for i in 0..n_channels {
            let residue = c[[i, m]];
            c[[i, m]] = Complex64::new(residue.re, 0.0);
            c[[i, m + 1]] = Complex64::new(residue.im, 0.0);
        }

        let b1 = 2.0 * b[m].re;
        let b2 = -2.0 * b[m].im;
        b[m] = Complex64::new(b1, 0.0);
        b[m + 1] = Complex64::new(b2, 0.0);
    }

    StateSpace {
        a,
        b,
        c,
        d: d.clone(),
        e: e.clone(),
        realization: Realization::Real,
    }
}

impl StateSpace {
    /// State dimension N
    #[inline]
    pub fn order(&self) -> usize {
        self.a.nrows()
    }

    /// Number of outputs Nc
    #[inline]
    pub fn n_channels(&self) -> usize {
        self.c.nrows()
    }

    /// Evaluate `C (sI - A)^-1 B + D + s E` at one complex frequency
    ///
    /// `A` is walked block by block (1x1 or 2x2 on the diagonal), so no
    /// general matrix inverse is formed.
    pub fn response(&self, s: Complex64) -> Array1<Complex64> {
        let n = self.order();
        let mut y: Array1<Complex64> = self
            .d
            .iter()
            .zip(self.e.iter())
            .map(|(&d, &e)| s * e + d)
            .collect();

        let mut k = 0;
        while k < n {
            let two_by_two = k + 1 < n && self.a[[k, k + 1]] != Complex64::new(0.0, 0.0);
            if two_by_two {
                // Solve [[s - a00, -a01], [-a10, s - a11]] x = [b0, b1]
                let m00 = s - self.a[[k, k]];
                let m01 = -self.a[[k, k + 1]];
                let m10 = -self.a[[k + 1, k]];
                let m11 = s - self.a[[k + 1, k + 1]];
                let det = m00 * m11 - m01 * m10;
                let x0 = (m11 * self.b[k] - m01 * self.b[k + 1]) / det;
                let x1 = (m00 * self.b[k + 1] - m10 * self.b[k]) / det;
                for i in 0..y.len() {
                    y[i] += self.c[[i, k]] * x0 + self.c[[i, k + 1]] * x1;
                }
                k += 2;
            } else {
                let x = self.b[k] / (s - self.a[[k, k]]);
                for i in 0..y.len() {
                    y[i] += self.c[[i, k]] * x;
                }
                k += 1;
            }
        }

        y
    }

    /// Real-valued matrices, available for the real realization only
    pub fn to_real(&self) -> Option<RealStateSpace> {
        if self.realization != Realization::Real {
            return None;
        }
        Some(RealStateSpace {
            a: self.a.mapv(|v| v.re),
            b: self.b.mapv(|v| v.re),
            c: self.c.mapv(|v| v.re),
            d: self.d.clone(),
            e: self.e.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::linalg;
    use approx::assert_relative_eq;

    fn pair_model() -> (PoleSet, Array2<Complex64>) {
        let p = Complex64::new(-1.0, 5.0);
        let r = Complex64::new(0.5, -2.0);
        let poles = PoleSet::new(vec![p, p.conj()]).unwrap();
        let residues = Array2::from_shape_vec((1, 2), vec![r, r.conj()]).unwrap();
        (poles, residues)
    }

    #[test]
    fn test_real_block_layout() {
        let (poles, residues) = pair_model();
        let ss = assemble(&poles, &residues, &Array1::zeros(1), &Array1::zeros(1), false);

        assert_eq!(ss.realization, Realization::Real);
        let real = ss.to_real().unwrap();
        assert_eq!(real.a, Array2::from_shape_vec((2, 2), vec![-1.0, 5.0, -5.0, -1.0]).unwrap());
        assert_eq!(real.b, Array1::from_vec(vec![2.0, 0.0]));
        assert_eq!(real.c, Array2::from_shape_vec((1, 2), vec![0.5, -2.0]).unwrap());
    }

    #[test]
    fn test_real_block_eigenvalues() {
        let (poles, residues) = pair_model();
        let ss = assemble(&poles, &residues, &Array1::zeros(1), &Array1::zeros(1), false);

        let mut eigs = linalg::eigenvalues(&ss.to_real().unwrap().a).unwrap();
        eigs.sort_by(|x, y| y.im.total_cmp(&x.im));
        assert_relative_eq!(eigs[0].re, -1.0, epsilon = 1e-12);
        assert_relative_eq!(eigs[0].im, 5.0, epsilon = 1e-12);
        assert_relative_eq!(eigs[1].re, -1.0, epsilon = 1e-12);
        assert_relative_eq!(eigs[1].im, -5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_real_and_complex_responses_agree() {
        let (poles, residues) = pair_model();
        let d = Array1::from_vec(vec![0.1]);
        let e = Array1::from_vec(vec![0.01]);
        let real = assemble(&poles, &residues, &d, &e, false);
        let complex = assemble(&poles, &residues, &d, &e, true);

        assert!(complex.to_real().is_none());
        for w in [0.0, 0.5, 4.9, 5.0, 12.0] {
            let s = Complex64::new(0.0, w);
            let y_real = real.response(s);
            let y_complex = complex.response(s);
            assert_relative_eq!(y_real[0].re, y_complex[0].re, epsilon = 1e-12);
            assert_relative_eq!(y_real[0].im, y_complex[0].im, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_real_poles_stay_diagonal() {
        let poles = PoleSet::new(vec![Complex64::new(-1.0, 0.0), Complex64::new(-3.0, 0.0)]).unwrap();
        let residues = Array2::from_elem((1, 2), Complex64::new(1.0, 0.0));
        let ss = assemble(&poles, &residues, &Array1::zeros(1), &Array1::zeros(1), false);

        assert_eq!(ss.a[[0, 1]], Complex64::new(0.0, 0.0));
        assert_eq!(ss.b, Array1::from_elem(2, Complex64::new(1.0, 0.0)));

        // 1/(s+1) + 1/(s+3) at s = 0
        let y = ss.response(Complex64::new(0.0, 0.0));
        assert_relative_eq!(y[0].re, 1.0 + 1.0 / 3.0, epsilon = 1e-14);
    }
}
