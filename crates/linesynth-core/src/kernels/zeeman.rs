//! Anomalous Zeeman pattern of a single transition.
//!
//! Angular momenta are handled as doubled integers internally so half-integer
//! J values compare exactly.

use serde::Serialize;

use crate::common::constants::{BOHR_MAGNETON, NM_PER_M, PLANCK, SPEED_OF_LIGHT};
use crate::numerics::WavelengthAxis;

const HALF_INTEGER_TOLERANCE: f64 = 1.0e-9;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ZeemanError {
    #[error("{level} J must be a non-negative integer or half-integer, got {value}")]
    InvalidAngularMomentum { level: &'static str, value: f64 },
    #[error("Zeeman pattern requires |J_upper - J_lower| <= 1, got J_upper={upper}, J_lower={lower}")]
    ForbiddenTransition { upper: f64, lower: f64 },
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarization {
    Pi,
    SigmaPlus,
    SigmaMinus,
}

impl Polarization {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::SigmaPlus => "sigma_plus",
            Self::SigmaMinus => "sigma_minus",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZeemanComponent {
    pub upper_m: f64,
    pub lower_m: f64,
    pub polarization: Polarization,
    /// Component wavelength in nm.
    pub wavelength: f64,
    /// Offset from the unperturbed line in nm.
    pub offset: f64,
    /// Condon-Shortley relative line strength.
    pub intensity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZeemanInput {
    pub wavelength: f64,
    pub magnetic_field: f64,
    pub upper_j: f64,
    pub lower_j: f64,
    pub upper_g: f64,
    pub lower_g: f64,
}

impl ZeemanInput {
    pub fn new(
        wavelength: f64,
        magnetic_field: f64,
        upper_j: f64,
        lower_j: f64,
        upper_g: f64,
        lower_g: f64,
    ) -> Self {
        Self {
            wavelength,
            magnetic_field,
            upper_j,
            lower_j,
            upper_g,
            lower_g,
        }
    }
}

/// Magnetic sublevels `-J, -J+1, ..., J`.
pub fn magnetic_sublevels(j: f64) -> Result<Vec<f64>, ZeemanError> {
    let twice_j = doubled("J", j)?;
    Ok((0..=twice_j)
        .map(|step| (2 * step - twice_j) as f64 / 2.0)
        .collect())
}

/// Every sublevel pair with `|m_upper - m_lower| <= 1`, including pairs
/// whose line strength vanishes.
pub fn zeeman_components(input: ZeemanInput) -> Result<Vec<ZeemanComponent>, ZeemanError> {
    for (field, value) in [
        ("wavelength", input.wavelength),
        ("magnetic field", input.magnetic_field),
        ("upper g", input.upper_g),
        ("lower g", input.lower_g),
    ] {
        if !value.is_finite() {
            return Err(ZeemanError::NonFinite { field, value });
        }
    }

    let twice_upper = doubled("upper", input.upper_j)?;
    let twice_lower = doubled("lower", input.lower_j)?;
    if (twice_upper - twice_lower).abs() > 2 || (twice_upper - twice_lower) % 2 != 0 {
        return Err(ZeemanError::ForbiddenTransition {
            upper: input.upper_j,
            lower: input.lower_j,
        });
    }

    let photon_energy = PLANCK * SPEED_OF_LIGHT / (input.wavelength / NM_PER_M);
    let upper_j = twice_upper as f64 / 2.0;
    let mut components = Vec::new();

    for twice_mu in (-twice_upper..=twice_upper).step_by(2) {
        for twice_ml in (-twice_lower..=twice_lower).step_by(2) {
            let delta = twice_ml - twice_mu;
            if delta.abs() > 2 {
                continue;
            }
            let upper_m = twice_mu as f64 / 2.0;
            let lower_m = twice_ml as f64 / 2.0;

            let energy_shift = BOHR_MAGNETON
                * input.magnetic_field
                * (upper_m * input.upper_g - lower_m * input.lower_g);
            let wavelength = if energy_shift == 0.0 {
                input.wavelength
            } else {
                PLANCK * SPEED_OF_LIGHT / (photon_energy + energy_shift) * NM_PER_M
            };

            let polarization = match delta {
                0 => Polarization::Pi,
                2 => Polarization::SigmaPlus,
                _ => Polarization::SigmaMinus,
            };
            let intensity = line_strength(twice_upper - twice_lower, upper_j, upper_m, delta);

            components.push(ZeemanComponent {
                upper_m,
                lower_m,
                polarization,
                wavelength,
                offset: wavelength - input.wavelength,
                intensity,
            });
        }
    }

    Ok(components)
}

/// Deposits each component into the fine-axis bin nearest
/// `center + offset` and divides by the number of allowed components.
/// With `sigma_only`, pi components are suppressed but still counted.
pub fn zeeman_pattern(
    axis: &WavelengthAxis,
    center: f64,
    components: &[ZeemanComponent],
    sigma_only: bool,
) -> Vec<f64> {
    let mut pattern = vec![0.0; axis.len()];
    if components.is_empty() {
        return pattern;
    }
    for component in components {
        if sigma_only && component.polarization == Polarization::Pi {
            continue;
        }
        pattern[axis.nearest_index(center + component.offset)] += component.intensity;
    }
    let count = components.len() as f64;
    for value in &mut pattern {
        *value /= count;
    }
    pattern
}

/// Condon-Shortley relative strengths with `J = J_upper`, `M = m_upper`
/// and `delta = 2 * (m_lower - m_upper)`.
fn line_strength(twice_delta_j: i64, j: f64, m: f64, delta: i64) -> f64 {
    match (twice_delta_j, delta) {
        // J -> J
        (0, 0) => m * m,
        (0, 2) => 0.25 * (j - m) * (j + m + 1.0),
        (0, _) => 0.25 * (j + m) * (j - m + 1.0),
        // J_upper = J_lower - 1
        (-2, 0) => (j + 1.0).powi(2) - m * m,
        (-2, 2) => 0.25 * (j + m + 1.0) * (j + m + 2.0),
        (-2, _) => 0.25 * (j - m + 1.0) * (j - m + 2.0),
        // J_upper = J_lower + 1
        (_, 0) => j * j - m * m,
        (_, 2) => 0.25 * (j - m) * (j - m - 1.0),
        (_, _) => 0.25 * (j + m) * (j + m - 1.0),
    }
}

fn doubled(level: &'static str, j: f64) -> Result<i64, ZeemanError> {
    let twice = 2.0 * j;
    if !j.is_finite() || j < 0.0 || (twice - twice.round()).abs() > HALF_INTEGER_TOLERANCE {
        return Err(ZeemanError::InvalidAngularMomentum { level, value: j });
    }
    Ok(twice.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::{
        Polarization, ZeemanError, ZeemanInput, magnetic_sublevels, zeeman_components,
        zeeman_pattern,
    };
    use crate::numerics::WavelengthAxis;

    #[test]
    fn sublevels_cover_integer_and_half_integer_j() {
        assert_eq!(magnetic_sublevels(1.0).expect("J=1"), vec![-1.0, 0.0, 1.0]);
        assert_eq!(
            magnetic_sublevels(1.5).expect("J=3/2"),
            vec![-1.5, -0.5, 0.5, 1.5]
        );
        assert!(matches!(
            magnetic_sublevels(0.3),
            Err(ZeemanError::InvalidAngularMomentum { .. })
        ));
    }

    #[test]
    fn j1_to_j1_gives_seven_components_with_known_strengths() {
        let components =
            zeeman_components(ZeemanInput::new(500.0, 1.0, 1.0, 1.0, 1.5, 1.0)).expect("pattern");
        assert_eq!(components.len(), 7);
        assert!(
            components
                .iter()
                .all(|component| (component.upper_m - component.lower_m).abs() <= 1.0)
        );

        let pi: Vec<_> = components
            .iter()
            .filter(|component| component.polarization == Polarization::Pi)
            .collect();
        assert_eq!(pi.len(), 3);
        let central_pi = pi
            .iter()
            .find(|component| component.upper_m == 0.0)
            .expect("central pi");
        assert_eq!(central_pi.intensity, 0.0);
        assert_eq!(central_pi.wavelength, 500.0);

        let nonzero = components
            .iter()
            .filter(|component| component.intensity > 0.0)
            .count();
        assert_eq!(nonzero, 6);
        for component in components
            .iter()
            .filter(|component| component.polarization != Polarization::Pi)
        {
            assert!((component.intensity - 0.5).abs() < 1.0e-12);
        }
    }

    #[test]
    fn normal_triplet_splits_symmetrically() {
        let components =
            zeeman_components(ZeemanInput::new(643.85, 1.0, 1.0, 0.0, 1.0, 1.0)).expect("pattern");
        assert_eq!(components.len(), 3);
        let plus = components
            .iter()
            .find(|component| component.upper_m == 1.0)
            .expect("m=+1");
        let minus = components
            .iter()
            .find(|component| component.upper_m == -1.0)
            .expect("m=-1");
        // dlambda = lambda^2 * mu_B * B / (h c) ~ 0.0194 nm at 643.85 nm, 1 T.
        assert!((minus.offset - 0.019_36).abs() < 2.0e-4, "{}", minus.offset);
        assert!(plus.offset < 0.0);
        assert!((plus.offset + minus.offset).abs() < 1.0e-5);
        assert_eq!(plus.intensity, 0.5);
        assert_eq!(
            components
                .iter()
                .find(|component| component.polarization == Polarization::Pi)
                .map(|component| component.intensity),
            Some(1.0)
        );
    }

    #[test]
    fn forbidden_and_malformed_transitions_are_rejected() {
        assert!(matches!(
            zeeman_components(ZeemanInput::new(500.0, 1.0, 3.0, 1.0, 1.0, 1.0)),
            Err(ZeemanError::ForbiddenTransition { .. })
        ));
        assert!(matches!(
            zeeman_components(ZeemanInput::new(500.0, 1.0, 1.5, 1.0, 1.0, 1.0)),
            Err(ZeemanError::ForbiddenTransition { .. })
        ));
        assert!(matches!(
            zeeman_components(ZeemanInput::new(500.0, 1.0, -1.0, 0.0, 1.0, 1.0)),
            Err(ZeemanError::InvalidAngularMomentum { level: "upper", .. })
        ));
    }

    #[test]
    fn pattern_is_divided_by_component_count_and_can_drop_pi() {
        let axis = WavelengthAxis::stepped(499.0, 501.0, 0.001).expect("axis");
        let components =
            zeeman_components(ZeemanInput::new(500.0, 5.0, 1.0, 1.0, 1.5, 1.0)).expect("pattern");

        let full = zeeman_pattern(&axis, axis.middle(), &components, false);
        let total: f64 = full.iter().sum();
        // 2 (pi) + 4 * 0.5 (sigma) over 7 components
        assert!((total - 4.0 / 7.0).abs() < 1.0e-12);

        let sigma = zeeman_pattern(&axis, axis.middle(), &components, true);
        let sigma_total: f64 = sigma.iter().sum();
        assert!((sigma_total - 2.0 / 7.0).abs() < 1.0e-12);
    }
}
