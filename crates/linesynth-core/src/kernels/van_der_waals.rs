//! Van der Waals (neutral perturber) broadening after Konjević,
//! Phys. Rep. 316 (1999) 339.

use super::profiles::lorentzian;
use crate::common::constants::{
    CM_PER_NM, CM3_PER_ANGSTROM3, PER_CM3_PER_M3, RYDBERG_ENERGY_EV,
};
use crate::common::reduced_mass;
use crate::domain::{SpeciesProperties, Transition};

const WIDTH_COEFFICIENT: f64 = 8.18e-12;
const SHIFT_TO_WIDTH: f64 = 0.28;
const BALMER_ALPHA_REFERENCE: f64 = 656.280;

/// Fine-structure components of H-alpha (NIST, J. Phys. Chem. Ref. Data 38,
/// 2009): weight `A_ik * g_i`, wavelength (nm), upper and lower energy (eV),
/// upper and lower l.
const BALMER_ALPHA_COMPONENTS: [(f64, f64, f64, f64, u32, u32); 7] = [
    (0.224_48 * 4.0, 656.2724, 12.087_507, 10.198_81, 1, 0),
    (0.224_49 * 2.0, 656.2771, 12.087_49, 10.198_81, 1, 0),
    (0.042_097 * 2.0, 656.2909, 12.087_495, 10.198_85, 0, 1),
    (0.021_046 * 2.0, 656.2752, 12.087_495, 10.198_806, 0, 1),
    (0.646_51 * 6.0, 656.2852, 12.087_51, 10.198_85, 0, 1),
    (0.538_77 * 4.0, 656.2701, 12.087_507, 10.198_806, 2, 1),
    (0.107_75 * 4.0, 656.2868, 12.087_507, 10.198_85, 2, 1),
];

/// Reasons a van der Waals width cannot be computed for a transition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VanDerWaalsGap {
    #[error("van der Waals broadening needs upper and lower orbital quantum numbers")]
    MissingOrbitalNumbers,
    #[error("perturber '{symbol}' has no tabulated polarizability")]
    MissingPolarizability { symbol: String },
    #[error("van der Waals broadening needs a gas or perturber temperature")]
    MissingTemperature,
    #[error("van der Waals broadening needs a perturber species")]
    MissingPerturber,
    #[error(
        "level energy {level_energy} eV is not below the ionization energy {ionization_energy} eV"
    )]
    UnboundLevel {
        level_energy: f64,
        ionization_energy: f64,
    },
    #[error("upper and lower mean-square radii give a non-positive difference {value}")]
    NonPositiveRadius { value: f64 },
}

/// Parameters of the single-line width formula. Energies in eV,
/// polarizability in Å³, density in m^-3, temperature in K, masses in u.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VanDerWaalsInput {
    pub wavelength: f64,
    pub upper_energy: f64,
    pub lower_energy: f64,
    pub upper_l: u32,
    pub lower_l: u32,
    pub ionization_energy: f64,
    pub emitter_mass: f64,
    pub perturber_mass: f64,
    pub polarizability: f64,
    pub temperature: f64,
    pub density: f64,
}

impl VanDerWaalsInput {
    /// Collects the width parameters from a transition and a resolved
    /// perturber. The perturber's temperature is used.
    pub fn from_transition(
        transition: &Transition,
        perturber: Option<&SpeciesProperties>,
        density: f64,
    ) -> Result<Self, VanDerWaalsGap> {
        let perturber = perturber.ok_or(VanDerWaalsGap::MissingPerturber)?;
        let polarizability =
            perturber
                .polarizability
                .ok_or_else(|| VanDerWaalsGap::MissingPolarizability {
                    symbol: perturber.symbol.clone(),
                })?;
        let temperature = perturber
            .temperature
            .ok_or(VanDerWaalsGap::MissingTemperature)?;
        let (upper_l, lower_l) = match (transition.upper_l, transition.lower_l) {
            (Some(upper), Some(lower)) => (upper, lower),
            _ if is_balmer_alpha(transition) => (0, 0),
            _ => return Err(VanDerWaalsGap::MissingOrbitalNumbers),
        };

        Ok(Self {
            wavelength: transition.wavelength,
            upper_energy: transition.upper_energy,
            lower_energy: transition.lower_energy,
            upper_l,
            lower_l,
            ionization_energy: transition.emitter.ionization_energy,
            emitter_mass: transition.emitter.mass,
            perturber_mass: perturber.mass,
            polarizability,
            temperature,
            density,
        })
    }

    fn with_levels(&self, upper_energy: f64, lower_energy: f64, upper_l: u32, lower_l: u32) -> Self {
        Self {
            upper_energy,
            lower_energy,
            upper_l,
            lower_l,
            ..*self
        }
    }
}

/// Mean-square radius of a level in units of the Bohr radius squared,
/// from its effective principal quantum number.
pub fn mean_square_radius(
    ionization_energy: f64,
    level_energy: f64,
    l: u32,
) -> Result<f64, VanDerWaalsGap> {
    let binding = ionization_energy - level_energy;
    if binding <= 0.0 {
        return Err(VanDerWaalsGap::UnboundLevel {
            level_energy,
            ionization_energy,
        });
    }
    let n_eff2 = RYDBERG_ENERGY_EV / binding;
    let l = l as f64;
    Ok(0.5 * n_eff2 * (5.0 * n_eff2 + 1.0 - 3.0 * l * (l + 1.0)))
}

/// Lorentzian FWHM in nm.
pub fn width(input: &VanDerWaalsInput) -> Result<f64, VanDerWaalsGap> {
    let upper = mean_square_radius(input.ionization_energy, input.upper_energy, input.upper_l)?;
    let lower = mean_square_radius(input.ionization_energy, input.lower_energy, input.lower_l)?;
    let radius2 = upper - lower;
    if radius2 <= 0.0 {
        return Err(VanDerWaalsGap::NonPositiveRadius { value: radius2 });
    }

    let mu = reduced_mass(input.emitter_mass, input.perturber_mass);
    let alpha = input.polarizability * CM3_PER_ANGSTROM3;
    let density = input.density * PER_CM3_PER_M3;
    let wavelength = input.wavelength * CM_PER_NM;

    let width_cm = WIDTH_COEFFICIENT
        * wavelength.powi(2)
        * (alpha * radius2).powf(0.4)
        * (input.temperature / mu).powf(0.3)
        * density;
    Ok(width_cm / CM_PER_NM)
}

/// Red shift in nm, a fixed fraction of the width.
pub fn shift(input: &VanDerWaalsInput) -> Result<f64, VanDerWaalsGap> {
    Ok(SHIFT_TO_WIDTH * width(input)?)
}

/// Area-normalized profile centred on `center`. H-alpha uses the weighted
/// sum of its fine-structure components, each with its own width; every
/// other line is a single Lorentzian.
pub fn van_der_waals_profile(
    axis: &[f64],
    center: f64,
    input: &VanDerWaalsInput,
    hydrogen_alpha: bool,
) -> Result<Vec<f64>, VanDerWaalsGap> {
    if !hydrogen_alpha {
        return Ok(lorentzian(axis, center, width(input)?));
    }

    let total_weight: f64 = BALMER_ALPHA_COMPONENTS
        .iter()
        .map(|component| component.0)
        .sum();
    let mut profile = vec![0.0; axis.len()];
    for (weight, wavelength, upper_energy, lower_energy, upper_l, lower_l) in
        BALMER_ALPHA_COMPONENTS
    {
        let component = input.with_levels(upper_energy, lower_energy, upper_l, lower_l);
        let component_center = wavelength - BALMER_ALPHA_REFERENCE + center;
        let shape = lorentzian(axis, component_center, width(&component)?);
        for (slot, value) in profile.iter_mut().zip(shape) {
            *slot += weight / total_weight * value;
        }
    }
    Ok(profile)
}

pub fn is_balmer_alpha(transition: &Transition) -> bool {
    transition.emitter.is("H", 0) && transition.nominal_wavelength() == 656
}
