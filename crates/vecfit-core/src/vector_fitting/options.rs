//! Fitting options

use std::str::FromStr;

/// Asymptotic behaviour added on top of the pole-residue sum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AsymptoticTrend {
    /// No D and no E term
    Zero,
    /// Constant term D
    #[default]
    Constant,
    /// Constant term D and proportional term s*E
    Linear,
}

impl AsymptoticTrend {
    /// Number of trend columns appended to the pole basis
    #[inline]
    pub fn n_terms(self) -> usize {
        match self {
            AsymptoticTrend::Zero => 0,
            AsymptoticTrend::Constant => 1,
            AsymptoticTrend::Linear => 2,
        }
    }
}

impl FromStr for AsymptoticTrend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zero" | "none" => Ok(AsymptoticTrend::Zero),
            "constant" | "d" => Ok(AsymptoticTrend::Constant),
            "linear" | "de" => Ok(AsymptoticTrend::Linear),
            _ => Err(format!(
                "Invalid asymptotic trend: {}. Use 'zero', 'constant' or 'linear'",
                s
            )),
        }
    }
}

/// Options for one fitting pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Keep the starting poles as they are
    pub skip_pole_identification: bool,
    /// Produce a pole-only model (C, D and E left at zero)
    pub skip_residue_identification: bool,
    /// Use the relaxed non-triviality constraint for the scaling function
    pub relax: bool,
    pub asymptotic_trend: AsymptoticTrend,
    /// Reflect right-half-plane poles into the left half-plane
    pub stable: bool,
    /// Keep the complex diagonal realization instead of the real block form
    pub complex_state_space: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            skip_pole_identification: false,
            skip_residue_identification: false,
            relax: true,
            asymptotic_trend: AsymptoticTrend::Constant,
            stable: true,
            complex_state_space: false,
        }
    }
}

impl Options {
    pub fn with_skip_pole_identification(mut self, skip: bool) -> Self {
        self.skip_pole_identification = skip;
        self
    }

    pub fn with_skip_residue_identification(mut self, skip: bool) -> Self {
        self.skip_residue_identification = skip;
        self
    }

    pub fn with_relax(mut self, relax: bool) -> Self {
        self.relax = relax;
        self
    }

    pub fn with_asymptotic_trend(mut self, trend: AsymptoticTrend) -> Self {
        self.asymptotic_trend = trend;
        self
    }

    pub fn with_stable(mut self, stable: bool) -> Self {
        self.stable = stable;
        self
    }

    pub fn with_complex_state_space(mut self, complex: bool) -> Self {
        self.complex_state_space = complex;
        self
    }
}
