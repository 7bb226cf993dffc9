//! Built-in transitions for the lines that carry a Stark model.
//!
//! Energies and Einstein coefficients are NIST ASD values.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::common::builtin_species;
use crate::domain::{LineShapeResult, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinePreset {
    HydrogenAlpha,
    HydrogenBeta,
    HydrogenGamma,
    Helium447,
    Helium492,
    Oxygen777,
    Argon810,
}

impl LinePreset {
    pub const ALL: [LinePreset; 7] = [
        LinePreset::HydrogenAlpha,
        LinePreset::HydrogenBeta,
        LinePreset::HydrogenGamma,
        LinePreset::Helium447,
        LinePreset::Helium492,
        LinePreset::Oxygen777,
        LinePreset::Argon810,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HydrogenAlpha => "hydrogen_alpha",
            Self::HydrogenBeta => "hydrogen_beta",
            Self::HydrogenGamma => "hydrogen_gamma",
            Self::Helium447 => "helium_447",
            Self::Helium492 => "helium_492",
            Self::Oxygen777 => "oxygen_777",
            Self::Argon810 => "argon_810",
        }
    }

    pub fn transition(self) -> LineShapeResult<Transition> {
        let transition = match self {
            Self::HydrogenAlpha => {
                Transition::new(656.279, 12.087_506, 10.198_834, builtin_species("H I")?)
                    .with_einstein_a(4.410_1e7)
            }
            Self::HydrogenBeta => {
                Transition::new(486.135, 12.748_539, 10.198_834, builtin_species("H I")?)
                    .with_einstein_a(8.419_3e6)
            }
            Self::HydrogenGamma => {
                Transition::new(434.047, 13.054_498, 10.198_834, builtin_species("H I")?)
                    .with_einstein_a(2.530_4e6)
            }
            Self::Helium447 => {
                Transition::new(447.148, 23.736_6, 20.964_1, builtin_species("He I")?)
                    .with_angular_momenta(3.0, 2.0)
                    .with_lande_factors(1.333, 1.5)
                    .with_orbital_numbers(2, 1)
                    .with_einstein_a(2.458_3e7)
            }
            Self::Helium492 => {
                Transition::new(492.193, 23.742_1, 21.218_0, builtin_species("He I")?)
                    .with_angular_momenta(2.0, 1.0)
                    .with_lande_factors(1.0, 1.0)
                    .with_orbital_numbers(2, 1)
                    .with_einstein_a(1.985_6e7)
            }
            Self::Oxygen777 => {
                Transition::new(777.194, 10.740_5, 9.146_2, builtin_species("O I")?)
                    .with_angular_momenta(3.0, 2.0)
                    .with_lande_factors(1.668, 2.002)
                    .with_orbital_numbers(1, 0)
                    .with_einstein_a(3.69e7)
            }
            Self::Argon810 => {
                Transition::new(810.369, 13.153_1, 11.623_6, builtin_species("Ar I")?)
                    .with_angular_momenta(1.0, 1.0)
                    .with_lande_factors(1.107, 1.404)
                    .with_orbital_numbers(1, 0)
                    .with_einstein_a(2.5e7)
            }
        };
        Ok(transition)
    }
}

impl Display for LinePreset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}
