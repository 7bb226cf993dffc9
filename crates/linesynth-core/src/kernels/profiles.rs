//! Area-normalized line-shape primitives parameterized by FWHM.
//!
//! A non-positive width collapses the shape to a unit-area impulse on the
//! nearest sample so that zero broadening passes through a convolution
//! chain unchanged.

use std::f64::consts::{LN_2, PI};

pub fn gaussian(x: &[f64], center: f64, fwhm: f64) -> Vec<f64> {
    if fwhm.is_nan() || fwhm <= 0.0 {
        return impulse(x, center);
    }
    let norm = 1.0 / (fwhm * (PI / (4.0 * LN_2)).sqrt());
    x.iter()
        .map(|&value| norm * (-4.0 * LN_2 * (value - center).powi(2) / (fwhm * fwhm)).exp())
        .collect()
}

pub fn lorentzian(x: &[f64], center: f64, fwhm: f64) -> Vec<f64> {
    if fwhm.is_nan() || fwhm <= 0.0 {
        return impulse(x, center);
    }
    x.iter()
        .map(|&value| (2.0 / PI) * fwhm / (4.0 * (value - center).powi(2) + fwhm * fwhm))
        .collect()
}

/// `lorentz_fraction * lorentzian + (1 - lorentz_fraction) * gaussian`,
/// both with the same FWHM.
pub fn pseudo_voigt(x: &[f64], center: f64, fwhm: f64, lorentz_fraction: f64) -> Vec<f64> {
    let fraction = lorentz_fraction.clamp(0.0, 1.0);
    gaussian(x, center, fwhm)
        .into_iter()
        .zip(lorentzian(x, center, fwhm))
        .map(|(gauss, lorentz)| fraction * lorentz + (1.0 - fraction) * gauss)
        .collect()
}

/// Unit-area spike on the sample nearest `center`; zero when `center` lies
/// outside the grid.
pub fn impulse(x: &[f64], center: f64) -> Vec<f64> {
    let mut profile = vec![0.0; x.len()];
    if x.len() < 2 || center < x[0] || center > x[x.len() - 1] {
        return profile;
    }
    let index = nearest_sample(x, center);
    let lower = index.saturating_sub(1);
    let upper = (index + 1).min(x.len() - 1);
    let spacing = (x[upper] - x[lower]) / (upper - lower) as f64;
    profile[index] = 1.0 / spacing;
    profile
}

/// Full width at half maximum of a sampled single-peaked profile, using
/// linear interpolation of the half-maximum crossings.
pub fn measured_fwhm(x: &[f64], y: &[f64]) -> Option<f64> {
    let (peak_index, peak) = y
        .iter()
        .copied()
        .enumerate()
        .max_by(|lhs, rhs| lhs.1.total_cmp(&rhs.1))?;
    if peak.is_nan() || peak <= 0.0 {
        return None;
    }
    let half = 0.5 * peak;

    let left = (1..=peak_index).rev().find(|&i| y[i - 1] < half).map(|i| {
        let fraction = (half - y[i - 1]) / (y[i] - y[i - 1]);
        x[i - 1] + fraction * (x[i] - x[i - 1])
    })?;
    let right = (peak_index..y.len() - 1)
        .find(|&i| y[i + 1] < half)
        .map(|i| {
            let fraction = (y[i] - half) / (y[i] - y[i + 1]);
            x[i] + fraction * (x[i + 1] - x[i])
        })?;
    Some(right - left)
}

pub(crate) fn nearest_sample(x: &[f64], value: f64) -> usize {
    let upper = x.partition_point(|&point| point < value);
    if upper == 0 {
        0
    } else if upper >= x.len() {
        x.len() - 1
    } else if value - x[upper - 1] <= x[upper] - value {
        upper - 1
    } else {
        upper
    }
}
