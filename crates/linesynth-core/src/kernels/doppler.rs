//! Thermal and sputtered-particle Doppler kernels.
//!
//! Wavelengths in nm, temperatures in K, masses in u, energies in eV.

use std::f64::consts::{LN_2, PI};

use super::profiles::gaussian;
use crate::common::constants::{ATOMIC_MASS_UNIT, BOLTZMANN, ELECTRON_VOLT, SPEED_OF_LIGHT};

/// FWHM of the Maxwellian Doppler profile.
pub fn thermal_fwhm(center: f64, temperature: f64, mass: f64) -> f64 {
    center / SPEED_OF_LIGHT
        * (8.0 * BOLTZMANN * temperature * LN_2 / (mass * ATOMIC_MASS_UNIT)).sqrt()
}

pub fn maxwell(x: &[f64], center: f64, temperature: f64, mass: f64) -> Vec<f64> {
    gaussian(x, center, thermal_fwhm(center, temperature, mass))
}

/// Characteristic speed in m/s of particles sputtered from a surface with
/// binding energy `binding_energy`.
pub fn sputter_velocity(binding_energy: f64, mass: f64) -> f64 {
    (2.0 * binding_energy * ELECTRON_VOLT / (mass * ATOMIC_MASS_UNIT)).sqrt()
}

/// One-sided Thompson profile: emission only blue of `center`, zero for
/// `x > center`. Area-normalized.
pub fn thompson(x: &[f64], center: f64, velocity: f64) -> Vec<f64> {
    let scale = center * velocity / SPEED_OF_LIGHT;
    x.iter()
        .map(|&value| {
            if value > center {
                return 0.0;
            }
            let offset2 = (value - center).powi(2);
            16.0 / PI * scale.powi(3) * offset2 / (offset2 + scale * scale).powi(3)
        })
        .collect()
}

/// Symmetric Thompson profile. Area-normalized.
pub fn thompson_symmetric(x: &[f64], center: f64, velocity: f64) -> Vec<f64> {
    let scale = center * velocity / SPEED_OF_LIGHT;
    let norm = 0.5 * scale * scale;
    x.iter()
        .map(|&value| norm * ((value - center).powi(2) + scale * scale).powf(-1.5))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DopplerInput<'a> {
    pub axis: &'a [f64],
    pub center: f64,
    pub mass: f64,
    pub temperature: Option<f64>,
    pub binding_energy: Option<f64>,
    pub thermal_weight: Option<f64>,
    pub symmetric_sputtering: bool,
}

impl<'a> DopplerInput<'a> {
    pub fn new(axis: &'a [f64], center: f64, mass: f64) -> Self {
        Self {
            axis,
            center,
            mass,
            temperature: None,
            binding_energy: None,
            thermal_weight: None,
            symmetric_sputtering: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DopplerProfile {
    pub thermal: Option<Vec<f64>>,
    pub sputtered: Option<Vec<f64>>,
    pub combined: Vec<f64>,
    /// Set when a binding energy was given alongside a temperature but no
    /// thermal weight, so the sputtered component was left out.
    pub ignored_binding_energy: bool,
}

/// Combines the thermal and sputtered components:
/// `weight * thermal + (1 - weight) * sputtered` when temperature, binding
/// energy and weight are all present; either component alone otherwise.
/// Returns `None` when neither temperature nor binding energy is given.
pub fn doppler_profile(input: DopplerInput<'_>) -> Option<DopplerProfile> {
    let thermal = input
        .temperature
        .map(|temperature| maxwell(input.axis, input.center, temperature, input.mass));
    let sputtered = input.binding_energy.map(|binding_energy| {
        let velocity = sputter_velocity(binding_energy, input.mass);
        if input.symmetric_sputtering {
            thompson_symmetric(input.axis, input.center, velocity)
        } else {
            thompson(input.axis, input.center, velocity)
        }
    });

    match (thermal, sputtered) {
        (Some(thermal), Some(sputtered)) => match input.thermal_weight {
            Some(weight) => {
                let combined = thermal
                    .iter()
                    .zip(&sputtered)
                    .map(|(maxwell, thompson)| weight * maxwell + (1.0 - weight) * thompson)
                    .collect();
                Some(DopplerProfile {
                    thermal: Some(thermal),
                    sputtered: Some(sputtered),
                    combined,
                    ignored_binding_energy: false,
                })
            }
            None => Some(DopplerProfile {
                combined: thermal.clone(),
                thermal: Some(thermal),
                sputtered: None,
                ignored_binding_energy: true,
            }),
        },
        (Some(thermal), None) => Some(DopplerProfile {
            combined: thermal.clone(),
            thermal: Some(thermal),
            sputtered: None,
            ignored_binding_energy: false,
        }),
        (None, Some(sputtered)) => Some(DopplerProfile {
            combined: sputtered.clone(),
            thermal: None,
            sputtered: Some(sputtered),
            ignored_binding_energy: false,
        }),
        (None, None) => None,
    }
}
