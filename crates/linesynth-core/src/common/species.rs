//! Minimal species property table used to resolve named perturbers and the
//! emitters of the built-in line presets.
//!
//! Polarizabilities are CRC Handbook values in Å³; ionization energies are
//! NIST values in eV, one entry per ionization stage.

use crate::domain::SpeciesProperties;

struct SpeciesRecord {
    symbol: &'static str,
    mass: f64,
    ionization_energies: &'static [f64],
    polarizability: f64,
}

const SPECIES_TABLE: [SpeciesRecord; 8] = [
    SpeciesRecord {
        symbol: "H",
        mass: 1.008,
        ionization_energies: &[13.598_434],
        polarizability: 0.666_793,
    },
    SpeciesRecord {
        symbol: "He",
        mass: 4.002_602,
        ionization_energies: &[24.587_389, 54.417_763],
        polarizability: 0.204_956,
    },
    SpeciesRecord {
        symbol: "N",
        mass: 14.007,
        ionization_energies: &[14.534_13, 29.601_3],
        polarizability: 1.1,
    },
    SpeciesRecord {
        symbol: "O",
        mass: 15.999,
        ionization_energies: &[13.618_055, 35.121_12],
        polarizability: 0.802,
    },
    SpeciesRecord {
        symbol: "Ar",
        mass: 39.948,
        ionization_energies: &[15.759_61, 27.629_66],
        polarizability: 1.641_1,
    },
    SpeciesRecord {
        symbol: "N2",
        mass: 28.014,
        ionization_energies: &[15.581],
        polarizability: 1.740_3,
    },
    SpeciesRecord {
        symbol: "O2",
        mass: 31.998,
        ionization_energies: &[12.069_7],
        polarizability: 1.581_2,
    },
    SpeciesRecord {
        symbol: "H2O",
        mass: 18.015,
        ionization_energies: &[12.621],
        polarizability: 1.45,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeciesLookupError {
    #[error("species name must not be empty")]
    EmptyName,
    #[error("invalid ionization stage '{stage}' in species name '{name}'")]
    InvalidStage { name: String, stage: String },
    #[error("species '{symbol}' is not in the built-in species table")]
    UnknownSpecies { symbol: String },
    #[error("species '{symbol}' has no tabulated ionization energy for charge {charge}")]
    UnknownChargeState { symbol: String, charge: u32 },
}

/// Splits spectroscopic notation ("Ar II", "he i", "N2") into a normalized
/// symbol and a charge. A missing stage means the neutral species.
pub fn parse_spectroscopic_name(name: &str) -> Result<(String, u32), SpeciesLookupError> {
    let mut parts = name.split_whitespace();
    let symbol = parts.next().ok_or(SpeciesLookupError::EmptyName)?;
    let symbol = normalize_symbol(symbol);

    let charge = match parts.last() {
        Some(stage) => {
            let stage_value = roman::from(&stage.to_ascii_uppercase())
                .filter(|value| *value >= 1)
                .ok_or_else(|| SpeciesLookupError::InvalidStage {
                    name: name.to_string(),
                    stage: stage.to_string(),
                })?;
            (stage_value - 1) as u32
        }
        None => 0,
    };

    Ok((symbol, charge))
}

pub fn format_spectroscopic_name(symbol: &str, charge: u32) -> Option<String> {
    let stage = roman::to(charge as i32 + 1)?;
    Some(format!("{} {}", normalize_symbol(symbol), stage))
}

/// Resolves a named species into its property record.
pub fn builtin_species(name: &str) -> Result<SpeciesProperties, SpeciesLookupError> {
    let (symbol, charge) = parse_spectroscopic_name(name)?;
    let record = SPECIES_TABLE
        .iter()
        .find(|record| record.symbol.eq_ignore_ascii_case(&symbol))
        .ok_or_else(|| SpeciesLookupError::UnknownSpecies {
            symbol: symbol.clone(),
        })?;
    let ionization_energy = record
        .ionization_energies
        .get(charge as usize)
        .copied()
        .ok_or_else(|| SpeciesLookupError::UnknownChargeState {
            symbol: symbol.clone(),
            charge,
        })?;

    Ok(SpeciesProperties {
        symbol: record.symbol.to_string(),
        charge,
        mass: record.mass,
        ionization_energy,
        polarizability: (charge == 0).then_some(record.polarizability),
        temperature: None,
    })
}

pub fn reduced_mass(lhs: f64, rhs: f64) -> f64 {
    lhs * rhs / (lhs + rhs)
}

fn normalize_symbol(symbol: &str) -> String {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.map(|ch| ch.to_ascii_lowercase()))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        SpeciesLookupError, builtin_species, format_spectroscopic_name, parse_spectroscopic_name,
        reduced_mass,
    };

    #[test]
    fn spectroscopic_names_parse_roman_stages() {
        assert_eq!(
            parse_spectroscopic_name("Ar I").expect("Ar I"),
            ("Ar".to_string(), 0)
        );
        assert_eq!(
            parse_spectroscopic_name("  he ii ").expect("He II"),
            ("He".to_string(), 1)
        );
        assert_eq!(
            parse_spectroscopic_name("N2").expect("N2"),
            ("N2".to_string(), 0)
        );
        assert!(matches!(
            parse_spectroscopic_name("O Q"),
            Err(SpeciesLookupError::InvalidStage { .. })
        ));
        assert_eq!(
            parse_spectroscopic_name("   "),
            Err(SpeciesLookupError::EmptyName)
        );
    }

    #[test]
    fn spectroscopic_names_format_back() {
        assert_eq!(format_spectroscopic_name("fe", 3).as_deref(), Some("Fe IV"));
        assert_eq!(format_spectroscopic_name("H", 0).as_deref(), Some("H I"));
    }

    #[test]
    fn builtin_species_carry_polarizability_only_for_neutrals() {
        let argon = builtin_species("Ar I").expect("argon");
        assert_eq!(argon.symbol, "Ar");
        assert_eq!(argon.polarizability, Some(1.641_1));
        assert!((argon.ionization_energy - 15.759_61).abs() < 1.0e-9);

        let argon_ion = builtin_species("Ar II").expect("argon ion");
        assert_eq!(argon_ion.charge, 1);
        assert_eq!(argon_ion.polarizability, None);

        assert!(matches!(
            builtin_species("H II"),
            Err(SpeciesLookupError::UnknownChargeState { charge: 1, .. })
        ));
        assert!(matches!(
            builtin_species("Xe I"),
            Err(SpeciesLookupError::UnknownSpecies { .. })
        ));
    }

    #[test]
    fn reduced_mass_of_equal_masses_is_half() {
        assert!((reduced_mass(2.0, 2.0) - 1.0).abs() < 1.0e-15);
    }
}
