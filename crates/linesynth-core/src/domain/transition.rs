use serde::{Deserialize, Serialize};

use super::errors::{LineShapeError, LineShapeResult};
use crate::common::builtin_species;

/// Canonical species record every physics kernel works from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesProperties {
    pub symbol: String,
    #[serde(default)]
    pub charge: u32,
    /// Particle mass in u.
    pub mass: f64,
    /// Ionization energy of this charge stage in eV.
    pub ionization_energy: f64,
    /// Static dipole polarizability in Å³.
    #[serde(default)]
    pub polarizability: Option<f64>,
    /// Kinetic temperature in K when the species carries its own.
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl SpeciesProperties {
    pub fn is(&self, symbol: &str, charge: u32) -> bool {
        self.symbol.eq_ignore_ascii_case(symbol) && self.charge == charge
    }
}

/// A perturbing species from a plasma description: the species plus the
/// state it is found in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlasmaContext {
    pub species: SpeciesProperties,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub density: Option<f64>,
}

/// The forms a perturber may be given in. All of them resolve into one
/// [`SpeciesProperties`] before any physics runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PerturberSpec {
    /// Spectroscopic notation, e.g. `"Ar I"`.
    Named(String),
    Species(SpeciesProperties),
    Plasma(PlasmaContext),
}

impl PerturberSpec {
    /// Resolves the perturber. Its temperature falls back to the gas
    /// temperature, then to the electron temperature.
    pub fn resolve(
        &self,
        gas_temperature: Option<f64>,
        electron_temperature: Option<f64>,
    ) -> LineShapeResult<SpeciesProperties> {
        let mut species = match self {
            Self::Named(name) => builtin_species(name)?,
            Self::Species(species) => species.clone(),
            Self::Plasma(context) => {
                let mut species = context.species.clone();
                if context.temperature.is_some() {
                    species.temperature = context.temperature;
                }
                species
            }
        };

        if species.mass <= 0.0 || !species.mass.is_finite() {
            return Err(LineShapeError::invalid_parameter(
                "INPUT.PERTURBER_MASS",
                format!(
                    "perturber '{}' mass must be finite and > 0, got {}",
                    species.symbol, species.mass
                ),
            ));
        }

        if species.temperature.is_none() {
            species.temperature = gas_temperature.or(electron_temperature);
        }
        Ok(species)
    }
}

/// Atomic transition as supplied by the level/line database collaborator.
/// Optional quantum numbers disable the mechanisms that need them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Center wavelength in nm.
    pub wavelength: f64,
    /// Upper level energy in eV.
    pub upper_energy: f64,
    /// Lower level energy in eV.
    pub lower_energy: f64,
    #[serde(default)]
    pub upper_j: Option<f64>,
    #[serde(default)]
    pub lower_j: Option<f64>,
    #[serde(default)]
    pub upper_g: Option<f64>,
    #[serde(default)]
    pub lower_g: Option<f64>,
    #[serde(default)]
    pub upper_l: Option<u32>,
    #[serde(default)]
    pub lower_l: Option<u32>,
    #[serde(default)]
    pub einstein_a: Option<f64>,
    pub emitter: SpeciesProperties,
}

impl Transition {
    pub fn new(wavelength: f64, upper_energy: f64, lower_energy: f64, emitter: SpeciesProperties) -> Self {
        Self {
            wavelength,
            upper_energy,
            lower_energy,
            upper_j: None,
            lower_j: None,
            upper_g: None,
            lower_g: None,
            upper_l: None,
            lower_l: None,
            einstein_a: None,
            emitter,
        }
    }

    pub fn with_angular_momenta(mut self, upper_j: f64, lower_j: f64) -> Self {
        self.upper_j = Some(upper_j);
        self.lower_j = Some(lower_j);
        self
    }

    pub fn with_lande_factors(mut self, upper_g: f64, lower_g: f64) -> Self {
        self.upper_g = Some(upper_g);
        self.lower_g = Some(lower_g);
        self
    }

    pub fn with_orbital_numbers(mut self, upper_l: u32, lower_l: u32) -> Self {
        self.upper_l = Some(upper_l);
        self.lower_l = Some(lower_l);
        self
    }

    pub fn with_einstein_a(mut self, einstein_a: f64) -> Self {
        self.einstein_a = Some(einstein_a);
        self
    }

    /// Wavelength rounded to whole nm, the key the line tables use.
    pub fn nominal_wavelength(&self) -> i64 {
        self.wavelength.round() as i64
    }

    pub fn validate(&self) -> LineShapeResult<()> {
        if !self.wavelength.is_finite() || self.wavelength <= 0.0 {
            return Err(LineShapeError::invalid_parameter(
                "INPUT.TRANSITION_WAVELENGTH",
                format!(
                    "transition wavelength must be finite and > 0 nm, got {}",
                    self.wavelength
                ),
            ));
        }
        if !self.emitter.mass.is_finite() || self.emitter.mass <= 0.0 {
            return Err(LineShapeError::invalid_parameter(
                "INPUT.EMITTER_MASS",
                format!(
                    "emitter '{}' mass must be finite and > 0 u, got {}",
                    self.emitter.symbol, self.emitter.mass
                ),
            ));
        }
        Ok(())
    }
}
