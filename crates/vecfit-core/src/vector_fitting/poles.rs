//! Pole set abstraction for Vector Fitting
//!
//! Every pole carries a [`PoleKind`] tag. A complex pole occupies two
//! consecutive slots, the pole itself (`ConjugatePrimary`) immediately
//! followed by its conjugate (`ConjugateSecondary`); the tag drives the
//! real-valued basis substitution used by every solver.

use ndarray::Array1;
use num_complex::Complex64;
use std::cmp::Ordering;

use super::constants::REAL_POLE_TOLERANCE;
use super::error::{FitError, InputValidationError};

/// Role of a pole inside its ordered sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoleKind {
    Real,
    /// First slot of a conjugate pair
    ConjugatePrimary,
    /// Second slot of a conjugate pair, holds the conjugate of the previous pole
    ConjugateSecondary,
}

/// Check whether a pole is real within [`REAL_POLE_TOLERANCE`] of its magnitude
#[inline]
pub fn is_real_pole(pole: Complex64) -> bool {
    pole.im.abs() <= REAL_POLE_TOLERANCE * pole.norm().max(1.0)
}

/// An ordered set of poles with the conjugate-pairing invariant
#[derive(Debug, Clone, PartialEq)]
pub struct PoleSet {
    poles: Vec<Complex64>,
    kinds: Vec<PoleKind>,
}

impl PoleSet {
    /// Create a PoleSet from an ordered pole sequence
    ///
    /// Poles with |imag| below the tolerance are stored as exactly real.
    /// Every other pole must be immediately followed by its complex conjugate.
    pub fn new(poles: Vec<Complex64>) -> Result<Self, FitError> {
        if poles.is_empty() {
            return Err(InputValidationError::EmptyPoles.into());
        }

        let mut out = Vec::with_capacity(poles.len());
        let mut kinds = Vec::with_capacity(poles.len());

        let mut i = 0;
        while i < poles.len() {
            let pole = poles[i];
            if is_real_pole(pole) {
                out.push(Complex64::new(pole.re, 0.0));
                kinds.push(PoleKind::Real);
                i += 1;
                continue;
            }

            let paired = poles
                .get(i + 1)
                .is_some_and(|&next| (next - pole.conj()).norm() <= REAL_POLE_TOLERANCE * pole.norm());
            if !paired {
                return Err(InputValidationError::UnpairedPole { index: i, pole }.into());
            }

            out.extend([pole, pole.conj()]);
            kinds.extend([PoleKind::ConjugatePrimary, PoleKind::ConjugateSecondary]);
            i += 2;
        }

        Ok(Self { poles: out, kinds })
    }

    /// Create a PoleSet from separate real poles and complex pair representatives
    ///
    /// Each complex pole is emitted as a pair, the representative first.
    pub fn from_parts(real_poles: Vec<f64>, complex_poles: Vec<Complex64>) -> Self {
        let n = real_poles.len() + 2 * complex_poles.len();
        let mut poles = Vec::with_capacity(n);
        let mut kinds = Vec::with_capacity(n);

        for r in real_poles {
            poles.push(Complex64::new(r, 0.0));
            kinds.push(PoleKind::Real);
        }
        for c in complex_poles {
            poles.extend([c, c.conj()]);
            kinds.extend([PoleKind::ConjugatePrimary, PoleKind::ConjugateSecondary]);
        }

        Self { poles, kinds }
    }

    /// Build an ordered PoleSet from unordered roots of a real polynomial
    ///
    /// Real roots come first in ascending order, then conjugate pairs in
    /// ascending (real, imag) order of their upper-half-plane member, each
    /// pair emitted upper member first. Returns `None` when the complex roots
    /// do not split evenly between the two half-planes.
    pub(crate) fn from_roots(roots: &[Complex64]) -> Option<Self> {
        let mut real_poles: Vec<f64> = Vec::new();
        let mut upper: Vec<Complex64> = Vec::new();
        let mut n_lower = 0;

        for &root in roots {
            if is_real_pole(root) {
                real_poles.push(root.re);
            } else if root.im > 0.0 {
                upper.push(root);
            } else {
                n_lower += 1;
            }
        }
        if upper.len() != n_lower {
            return None;
        }

        real_poles.sort_by(f64::total_cmp);
        upper.sort_by(complex_ordering);

        Some(Self::from_parts(real_poles, upper))
    }

    /// Total number of poles (the model order N)
    #[inline]
    pub fn len(&self) -> usize {
        self.poles.len()
    }

    /// Check if pole set is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.poles.is_empty()
    }

    /// Model order: real poles count once, conjugate pairs twice
    #[inline]
    pub fn model_order(&self) -> usize {
        self.len()
    }

    /// Number of real poles
    #[inline]
    pub fn n_real(&self) -> usize {
        self.kinds.iter().filter(|&&k| k == PoleKind::Real).count()
    }

    /// Number of complex conjugate pairs
    #[inline]
    pub fn n_complex_pairs(&self) -> usize {
        self.kinds
            .iter()
            .filter(|&&k| k == PoleKind::ConjugatePrimary)
            .count()
    }

    /// Poles in order
    #[inline]
    pub fn poles(&self) -> &[Complex64] {
        &self.poles
    }

    /// Tags in order
    #[inline]
    pub fn kinds(&self) -> &[PoleKind] {
        &self.kinds
    }

    /// Iterate over (pole, kind) in order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Complex64, PoleKind)> + '_ {
        self.poles.iter().copied().zip(self.kinds.iter().copied())
    }

    /// Check that no pole lies in the open right half-plane
    pub fn is_stable(&self) -> bool {
        self.poles.iter().all(|p| p.re <= 0.0)
    }

    /// Convert to `Array1<Complex64>`
    pub fn to_array(&self) -> Array1<Complex64> {
        Array1::from_vec(self.poles.clone())
    }
}

/// Total order on complex numbers: real part first, then imaginary part
fn complex_ordering(a: &Complex64, b: &Complex64) -> Ordering {
    a.re.total_cmp(&b.re).then(a.im.total_cmp(&b.im))
}
