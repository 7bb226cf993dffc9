//! Neutral helium 447.1 nm (Gigosos & González, A&A 503 (2009) 293) and
//! 492.2 nm (Lara et al., A&A 542 (2012) A75) tables.
//!
//! One file per density. Column 0 is the offset in nm; the remaining columns
//! hold one profile per (temperature, mass ratio) pair.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use super::interpolation::{
    GridQuery, InterpolatedProfile, StarkGrid, TableAxis, TableProfile, interpolate_grid,
};
use super::tables::StarkTableCache;
use super::{StarkLine, StarkTableError};
use crate::numerics::log_grid;

const BAND_TOLERANCE: f64 = 1.0e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeliumLine {
    Line447,
    Line492,
}

impl HeliumLine {
    pub fn from_nominal_wavelength(nominal: i64) -> Option<Self> {
        match nominal {
            447 => Some(Self::Line447),
            492 => Some(Self::Line492),
            _ => None,
        }
    }

    pub fn density_stock(self) -> Vec<f64> {
        match self {
            Self::Line447 => log_grid(21.0, 24.0, 10),
            Self::Line492 => log_grid(20.0, 24.0, 13),
        }
    }

    pub const fn mass_ratio_stock(self) -> &'static [f64] {
        match self {
            Self::Line447 => &[0.8, 2.0, 4.0],
            Self::Line492 => &[0.8, 2.0, 4.0, 10.0],
        }
    }

    /// Temperatures (K) tabulated at the stock density `electron_density`.
    pub fn temperature_stock(self, electron_density: f64) -> Vec<f64> {
        let at_most = |limit: f64| electron_density <= limit * (1.0 + BAND_TOLERANCE);
        match self {
            Self::Line447 => {
                let stock = self.density_stock();
                if at_most(stock[4]) {
                    vec![5_000.0, 10_000.0, 20_000.0, 40_000.0]
                } else if electron_density < stock[8] * (1.0 - BAND_TOLERANCE) {
                    vec![10_000.0, 20_000.0, 40_000.0]
                } else {
                    vec![20_000.0, 40_000.0]
                }
            }
            Self::Line492 => {
                if at_most(1.0e22) {
                    vec![5_000.0, 10_000.0, 20_000.0, 40_000.0]
                } else if at_most(1.0e23) {
                    vec![10_000.0, 20_000.0, 30_000.0, 40_000.0]
                } else if electron_density < 1.0e24 * (1.0 - BAND_TOLERANCE) {
                    vec![20_000.0, 30_000.0, 40_000.0]
                } else {
                    vec![30_000.0, 40_000.0]
                }
            }
        }
    }

    pub fn table_number(self, electron_density: f64) -> i64 {
        let decades = (electron_density / 1.0e20).log10() * 3.0;
        match self {
            Self::Line447 => (decades - 1.0).round() as i64,
            Self::Line492 => (decades + 4.0).round() as i64,
        }
    }

    pub fn table_path(self, root: &Path, electron_density: f64) -> PathBuf {
        let file = format!("table{:02}.txt", self.table_number(electron_density));
        match self {
            Self::Line447 => root.join("Gigosos2009He").join(file),
            Self::Line492 => root.join("Lara2012He").join("He492").join(file),
        }
    }
}

impl Display for HeliumLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Line447 => f.write_str("He I 447"),
            Self::Line492 => f.write_str("He I 492"),
        }
    }
}

/// Column of the profile for the given temperature and mass-ratio ranks.
pub fn profile_column(temperature_rank: usize, temperature_count: usize, mass_rank: usize) -> usize {
    (temperature_rank + 1) + temperature_count * mass_rank
}

/// Helium grid over (n_e, mu, T) backed by one table per density.
pub struct HeliumGrid<'a> {
    cache: &'a StarkTableCache,
    root: &'a Path,
    line: HeliumLine,
    densities: Vec<f64>,
}

impl<'a> HeliumGrid<'a> {
    pub fn new(cache: &'a StarkTableCache, root: &'a Path, line: HeliumLine) -> Self {
        Self {
            cache,
            root,
            line,
            densities: line.density_stock(),
        }
    }

    /// Interpolated profile in nm offsets. Half profiles are mirrored; tables
    /// that already span negative offsets are used as stored.
    pub fn profile(
        &self,
        electron_density: f64,
        electron_temperature: f64,
        mass_ratio: f64,
    ) -> Result<InterpolatedProfile, StarkTableError> {
        let query = GridQuery {
            electron_density,
            mass_ratio,
            inner: electron_temperature,
        };
        let mut interpolated = interpolate_grid(self, query)?;
        if interpolated.profile.is_half_profile() {
            interpolated.profile = interpolated.profile.mirrored();
        }
        Ok(interpolated)
    }
}

impl StarkGrid for HeliumGrid<'_> {
    fn density_stock(&self) -> &[f64] {
        &self.densities
    }

    fn mass_ratio_stock(&self) -> &[f64] {
        self.line.mass_ratio_stock()
    }

    fn inner_axis(&self) -> TableAxis {
        TableAxis::Temperature
    }

    fn inner_stock(&self, density_index: usize) -> Vec<f64> {
        self.line.temperature_stock(self.densities[density_index])
    }

    fn load_profile(
        &self,
        density_index: usize,
        mass_ratio_index: usize,
        inner_index: usize,
    ) -> Result<TableProfile, StarkTableError> {
        let density = self.densities[density_index];
        let path = self.line.table_path(self.root, density);
        let table = self.cache.load(StarkLine::Helium(self.line), &path)?;
        let column = profile_column(
            inner_index,
            self.line.temperature_stock(density).len(),
            mass_ratio_index,
        );
        Ok(TableProfile::new(
            table.column(0)?.to_vec(),
            table.column(column)?.to_vec(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{HeliumLine, profile_column};
    use std::path::Path;

    #[test]
    fn temperature_stock_follows_density_bands() {
        let line = HeliumLine::Line447;
        let stock = line.density_stock();
        assert_eq!(line.temperature_stock(stock[0]).len(), 4);
        assert_eq!(line.temperature_stock(stock[4]).len(), 4);
        assert_eq!(line.temperature_stock(stock[5]), vec![10_000.0, 20_000.0, 40_000.0]);
        assert_eq!(line.temperature_stock(stock[8]), vec![20_000.0, 40_000.0]);

        let line = HeliumLine::Line492;
        let stock = line.density_stock();
        assert_eq!(line.temperature_stock(stock[6]).len(), 4);
        assert_eq!(line.temperature_stock(stock[6])[0], 5_000.0);
        assert_eq!(line.temperature_stock(stock[9])[0], 10_000.0);
        assert_eq!(line.temperature_stock(stock[10]), vec![20_000.0, 30_000.0, 40_000.0]);
        assert_eq!(line.temperature_stock(stock[12]), vec![30_000.0, 40_000.0]);
    }

    #[test]
    fn table_paths_follow_published_numbering() {
        let root = Path::new("/data");
        assert_eq!(
            HeliumLine::Line447.table_path(root, 1.0e21),
            root.join("Gigosos2009He").join("table02.txt")
        );
        assert_eq!(
            HeliumLine::Line492.table_path(root, 1.0e20),
            root.join("Lara2012He").join("He492").join("table04.txt")
        );
        assert_eq!(HeliumLine::Line492.table_number(1.0e24), 16);
    }

    #[test]
    fn profile_columns_interleave_temperature_within_mass_ratio() {
        assert_eq!(profile_column(0, 4, 0), 1);
        assert_eq!(profile_column(3, 4, 0), 4);
        assert_eq!(profile_column(1, 3, 2), 8);
    }
}
