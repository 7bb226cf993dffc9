//! Hydrogen Balmer profiles from the Gigosos & Cardeñoso computer-simulation
//! tables (Spectrochim. Acta B 58 (2003) 1489).
//!
//! Each `.dlp` file holds a half profile for one (n_e, mu, rho) grid point:
//! offset in m and intensity per m.

use std::f64::consts::PI;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use super::interpolation::{
    GridQuery, InterpolatedProfile, StarkGrid, TableAxis, TableProfile, interpolate_grid,
};
use super::tables::StarkTableCache;
use super::{StarkLine, StarkTableError};
use crate::common::constants::{BOLTZMANN, ELEMENTARY_CHARGE, NM_PER_M, VACUUM_PERMITTIVITY};
use crate::numerics::{linear_grid, log_grid};

const MASS_RATIO_STOCK: [f64; 17] = [
    0.5, 0.8, 0.9, 1.0, 1.25, 1.5, 1.75, 2.0, 2.5, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0,
];

/// The published file names were generated with slightly different
/// constants; this factor reproduces their temperature labels.
const FILE_TEMPERATURE_CORRECTION: f64 = 0.999_994_1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HydrogenLine {
    Alpha,
    Beta,
    Gamma,
}

impl HydrogenLine {
    pub fn from_nominal_wavelength(nominal: i64) -> Option<Self> {
        match nominal {
            656 => Some(Self::Alpha),
            486 => Some(Self::Beta),
            434 => Some(Self::Gamma),
            _ => None,
        }
    }

    pub const fn directory(self) -> &'static str {
        match self {
            Self::Alpha => "HalphaProfiles",
            Self::Beta => "HbetaProfiles",
            Self::Gamma => "HgammaProfiles",
        }
    }

    pub const fn file_prefix(self) -> &'static str {
        match self {
            Self::Alpha => "BAn",
            Self::Beta => "BBn",
            Self::Gamma => "BGn",
        }
    }

    /// Power-law Lorentzian width `coefficient * (n_e / 1e23)^exponent` nm
    /// fitted to the same tables; not available for H-gamma.
    pub const fn power_law(self) -> Option<(f64, f64)> {
        match self {
            Self::Alpha => Some((1.098, 0.679_65)),
            Self::Beta => Some((4.8, 0.681_16)),
            Self::Gamma => None,
        }
    }

    pub fn power_law_width(self, electron_density: f64) -> Option<f64> {
        self.power_law()
            .map(|(coefficient, exponent)| coefficient * (electron_density / 1.0e23).powf(exponent))
    }
}

impl Display for HydrogenLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alpha => f.write_str("H-alpha"),
            Self::Beta => f.write_str("H-beta"),
            Self::Gamma => f.write_str("H-gamma"),
        }
    }
}

pub fn density_stock() -> Vec<f64> {
    log_grid(20.0, 25.0, 16)
}

pub fn mass_ratio_stock() -> &'static [f64] {
    &MASS_RATIO_STOCK
}

pub fn debye_ratio_stock() -> Vec<f64> {
    linear_grid(0.1, 0.6, 11)
}

/// Mean inter-particle distance over Debye length, with `electron_density`
/// in m^-3 and `electron_temperature` in K.
pub fn debye_ratio(electron_density: f64, electron_temperature: f64) -> f64 {
    let r0 = (3.0 / (4.0 * PI * electron_density)).cbrt();
    let debye_length = (VACUUM_PERMITTIVITY * BOLTZMANN * electron_temperature
        / (electron_density * ELEMENTARY_CHARGE.powi(2)))
    .sqrt();
    r0 / debye_length
}

/// Electron temperature (K) at which `electron_density` gives Debye ratio
/// `rho`; the inverse of [`debye_ratio`].
pub fn debye_ratio_temperature(rho: f64, electron_density: f64) -> f64 {
    let r0 = (3.0 / (4.0 * PI * electron_density)).cbrt();
    electron_density * ELEMENTARY_CHARGE.powi(2) / (VACUUM_PERMITTIVITY * BOLTZMANN)
        * (r0 / rho).powi(2)
}

pub fn table_file_name(line: HydrogenLine, electron_density: f64, mass_ratio: f64, rho: f64) -> String {
    let density_label = (electron_density.log10() * 100.0).round() as i64;
    let temperature_label = (debye_ratio_temperature(rho, electron_density)
        * FILE_TEMPERATURE_CORRECTION)
        .round() as i64;
    let mass_label = (mass_ratio * 100.0).round() as i64;
    format!(
        "{}{density_label}t{temperature_label:07}m{mass_label:04}.dlp",
        line.file_prefix()
    )
}

pub fn table_path(
    root: &Path,
    line: HydrogenLine,
    electron_density: f64,
    mass_ratio: f64,
    rho: f64,
) -> PathBuf {
    root.join(line.directory())
        .join(table_file_name(line, electron_density, mass_ratio, rho))
}

/// Hydrogen grid over (n_e, mu, rho) backed by `.dlp` files under `root`.
pub struct HydrogenGrid<'a> {
    cache: &'a StarkTableCache,
    root: &'a Path,
    line: HydrogenLine,
    densities: Vec<f64>,
    debye_ratios: Vec<f64>,
}

impl<'a> HydrogenGrid<'a> {
    pub fn new(cache: &'a StarkTableCache, root: &'a Path, line: HydrogenLine) -> Self {
        Self {
            cache,
            root,
            line,
            densities: density_stock(),
            debye_ratios: debye_ratio_stock(),
        }
    }

    /// Interpolated full profile in nm offsets and per-nm intensities.
    pub fn profile(
        &self,
        electron_density: f64,
        electron_temperature: f64,
        mass_ratio: f64,
    ) -> Result<InterpolatedProfile, StarkTableError> {
        let query = GridQuery {
            electron_density,
            mass_ratio,
            inner: debye_ratio(electron_density, electron_temperature),
        };
        let mut interpolated = interpolate_grid(self, query)?;
        let full = interpolated.profile.mirrored();
        interpolated.profile = TableProfile::new(
            full.offsets.iter().map(|offset| offset * NM_PER_M).collect(),
            full.values.iter().map(|value| value / NM_PER_M).collect(),
        );
        Ok(interpolated)
    }
}

impl StarkGrid for HydrogenGrid<'_> {
    fn density_stock(&self) -> &[f64] {
        &self.densities
    }

    fn mass_ratio_stock(&self) -> &[f64] {
        &MASS_RATIO_STOCK
    }

    fn inner_axis(&self) -> TableAxis {
        TableAxis::DebyeRatio
    }

    fn inner_stock(&self, _density_index: usize) -> Vec<f64> {
        self.debye_ratios.clone()
    }

    fn load_profile(
        &self,
        density_index: usize,
        mass_ratio_index: usize,
        inner_index: usize,
    ) -> Result<TableProfile, StarkTableError> {
        let path = table_path(
            self.root,
            self.line,
            self.densities[density_index],
            MASS_RATIO_STOCK[mass_ratio_index],
            self.debye_ratios[inner_index],
        );
        let table = self.cache.load(StarkLine::Hydrogen(self.line), &path)?;
        Ok(TableProfile::new(
            table.column(0)?.to_vec(),
            table.column(1)?.to_vec(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        HydrogenLine, debye_ratio, debye_ratio_stock, debye_ratio_temperature, density_stock,
        table_file_name,
    };
    use crate::stark::{TableAxis, bracket};

    #[test]
    fn debye_ratio_round_trips_through_temperature() {
        let density = 1.0e23;
        let rho = debye_ratio(density, 20_000.0);
        assert!(rho > 0.1 && rho < 0.6, "rho {rho}");
        let temperature = debye_ratio_temperature(rho, density);
        assert!((temperature - 20_000.0).abs() < 1.0e-6);
    }

    #[test]
    fn zero_electron_temperature_clamps_to_the_largest_debye_ratio() {
        let rho = debye_ratio(1.0e22, 0.0);
        assert_eq!(rho, f64::INFINITY);
        let stock = debye_ratio_stock();
        let (edge, notice) = bracket(&stock, rho, TableAxis::DebyeRatio).expect("clamped");
        assert_eq!(edge.low_index, stock.len() - 1);
        assert_eq!(notice.map(|notice| notice.used), Some(0.6));
    }

    #[test]
    fn file_names_encode_density_temperature_and_mass_ratio() {
        let density = density_stock()[9];
        let name = table_file_name(HydrogenLine::Alpha, density, 1.0, 0.35);
        assert!(name.starts_with("BAn2300t"), "name {name}");
        assert!(name.ends_with("m0100.dlp"), "name {name}");
        assert_eq!(name.len(), "BAn2300t0000000m0100.dlp".len());

        let beta = table_file_name(HydrogenLine::Beta, 1.0e20, 0.5, 0.1);
        assert!(beta.starts_with("BBn2000t") && beta.ends_with("m0050.dlp"));
    }

    #[test]
    fn power_law_widths_cover_alpha_and_beta_only() {
        let alpha = HydrogenLine::Alpha.power_law_width(1.0e23).expect("alpha");
        assert!((alpha - 1.098).abs() < 1.0e-12);
        let beta = HydrogenLine::Beta.power_law_width(1.0e22).expect("beta");
        assert!((beta - 4.8 * 0.1_f64.powf(0.681_16)).abs() < 1.0e-12);
        assert!(HydrogenLine::Gamma.power_law_width(1.0e23).is_none());
        assert_eq!(HydrogenLine::from_nominal_wavelength(486), Some(HydrogenLine::Beta));
    }
}
