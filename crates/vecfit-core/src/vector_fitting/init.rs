//! Starting pole placement

use num_complex::Complex64;
use std::str::FromStr;

use super::constants::{COMPLEX_POLE_DAMPING_RATIO, DC_EDGE_FRACTION, MIN_ANGULAR_FREQUENCY};
use super::error::{FitError, InputValidationError};
use super::poles::PoleSet;
use super::samples::SampleSet;

/// Spacing of the starting poles over the sampled band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoleSpacing {
    Linear,
    #[default]
    Logarithmic,
}

impl FromStr for PoleSpacing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lin" | "linear" => Ok(PoleSpacing::Linear),
            "log" | "logarithmic" => Ok(PoleSpacing::Logarithmic),
            _ => Err(format!(
                "Invalid pole spacing: {}. Use 'linear' or 'logarithmic'",
                s
            )),
        }
    }
}

/// Generate `order` starting poles across the sampled `|Im(s)|` band
///
/// `order / 2` lightly damped pairs `-0.01 w +/- j w` are spread over the
/// band; an odd order adds one real pole at `-w` for the band midpoint.
///
/// # Arguments
/// * `samples` - Sorted sample set, only the frequencies are used
/// * `order` - Requested number of poles
/// * `spacing` - Linear or logarithmic spacing of the pair frequencies
pub fn starting_poles(
    samples: &SampleSet,
    order: usize,
    spacing: PoleSpacing,
) -> Result<PoleSet, FitError> {
    if order == 0 {
        return Err(InputValidationError::ZeroOrder.into());
    }

    let (w_min, w_max) = band_edges(samples);

    let spread = |n: usize| match spacing {
        PoleSpacing::Linear => linspace(w_min, w_max, n),
        PoleSpacing::Logarithmic => logspace(w_min, w_max, n),
    };

    let complex_poles: Vec<Complex64> = spread(order / 2)
        .into_iter()
        .map(|w| Complex64::new(-COMPLEX_POLE_DAMPING_RATIO * w, w))
        .collect();
    let real_poles: Vec<f64> = spread(order % 2).into_iter().map(|w| -w).collect();

    log::debug!(
        "starting poles: {} real, {} pairs over [{:e}, {:e}] rad/s",
        real_poles.len(),
        complex_poles.len(),
        w_min,
        w_max
    );

    Ok(PoleSet::from_parts(real_poles, complex_poles))
}

/// Lower and upper `|Im(s)|` edges, with a DC lower edge moved off zero
fn band_edges(samples: &SampleSet) -> (f64, f64) {
    let mut w: Vec<f64> = samples.s().iter().map(|s| s.im.abs()).collect();
    w.sort_by(f64::total_cmp);

    let w_max = w.last().copied().unwrap_or(0.0);
    let w_min = match w.first().copied() {
        Some(first) if first > 0.0 => first,
        // Poles cannot sit at DC
        _ => w
            .iter()
            .copied()
            .find(|&x| x > 0.0)
            .map(|next| next * DC_EDGE_FRACTION)
            .unwrap_or(MIN_ANGULAR_FREQUENCY),
    };

    (w_min, w_max.max(w_min))
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![(start + end) / 2.0],
        _ => (0..n)
            .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

fn logspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if start <= 0.0 || end <= 0.0 {
        return linspace(start, end, n);
    }
    linspace(start.ln(), end.ln(), n)
        .into_iter()
        .map(f64::exp)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_fitting::poles::PoleKind;
    use crate::vector_fitting::samples::Sample;
    use approx::assert_relative_eq;

    fn band(w: &[f64]) -> SampleSet {
        let samples = w
            .iter()
            .map(|&w| Sample::new(Complex64::new(0.0, w), vec![Complex64::new(1.0, 0.0)]))
            .collect();
        SampleSet::new(samples, None).unwrap()
    }

    #[test]
    fn test_linspace() {
        let v = linspace(0.0, 1.0, 5);
        assert_eq!(v.len(), 5);
        assert_relative_eq!(v[0], 0.0);
        assert_relative_eq!(v[2], 0.5);
        assert_relative_eq!(v[4], 1.0);
    }

    #[test]
    fn test_logspace() {
        let v = logspace(1.0, 100.0, 3);
        assert_relative_eq!(v[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(v[1], 10.0, epsilon = 1e-12);
        assert_relative_eq!(v[2], 100.0, epsilon = 1e-12);
    }

    #[test]
    fn test_starting_poles_even_order() {
        let samples = band(&[1.0, 10.0, 100.0]);
        let poles = starting_poles(&samples, 4, PoleSpacing::Logarithmic).unwrap();

        assert_eq!(poles.len(), 4);
        assert_eq!(poles.n_real(), 0);
        assert_relative_eq!(poles.poles()[0].im, 1.0, epsilon = 1e-12);
        assert_relative_eq!(poles.poles()[0].re, -0.01, epsilon = 1e-12);
        assert_relative_eq!(poles.poles()[2].im, 100.0, epsilon = 1e-10);
        assert!(poles.is_stable());
    }

    #[test]
    fn test_starting_poles_odd_order_adds_real_pole() {
        let samples = band(&[2.0, 4.0, 6.0]);
        let poles = starting_poles(&samples, 3, PoleSpacing::Linear).unwrap();

        assert_eq!(poles.kinds()[0], PoleKind::Real);
        assert_relative_eq!(poles.poles()[0].re, -4.0, epsilon = 1e-12);
        assert_eq!(poles.n_complex_pairs(), 1);
        assert_relative_eq!(poles.poles()[1].im, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_starting_poles_dc_edge() {
        let samples = band(&[0.0, 10.0, 1000.0]);
        let poles = starting_poles(&samples, 4, PoleSpacing::Linear).unwrap();

        assert_relative_eq!(poles.poles()[0].im, 10.0 * DC_EDGE_FRACTION, epsilon = 1e-12);
        assert!(poles.poles().iter().all(|p| p.norm() > 0.0));
    }

    #[test]
    fn test_starting_poles_zero_order() {
        let samples = band(&[1.0]);
        let err = starting_poles(&samples, 0, PoleSpacing::Linear).unwrap_err();
        assert_eq!(err, FitError::from(InputValidationError::ZeroOrder));
    }

    #[test]
    fn test_pole_spacing_from_str() {
        assert_eq!("LOG".parse::<PoleSpacing>().unwrap(), PoleSpacing::Logarithmic);
        assert_eq!("linear".parse::<PoleSpacing>().unwrap(), PoleSpacing::Linear);
        assert!("cubic".parse::<PoleSpacing>().is_err());
    }
}
