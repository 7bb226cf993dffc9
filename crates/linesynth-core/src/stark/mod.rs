pub mod griem;
pub mod helium;
pub mod hydrogen;
pub mod interpolation;
pub mod tables;

pub use griem::{GriemCoefficients, GriemLine, GriemWidthShift, width_shift};
pub use helium::{HeliumGrid, HeliumLine};
pub use hydrogen::{HydrogenGrid, HydrogenLine, debye_ratio, debye_ratio_temperature};
pub use interpolation::{
    Bracket, ClampNotice, GridQuery, InterpolatedProfile, StarkGrid, TableAxis, TableProfile,
    bracket, interpolate_grid,
};
pub use tables::{RawTable, StarkTableCache, TableRoots};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::common::reduced_mass;
use crate::domain::{LineShapeError, LineShapeResult, SpeciesProperties, Transition};
use crate::kernels::lorentzian;
use crate::numerics::{WavelengthAxis, interpolate_zero_fill};

#[derive(Debug, thiserror::Error)]
pub enum StarkTableError {
    #[error("Stark table '{}' does not exist", path.display())]
    MissingFile { path: PathBuf },
    #[error("failed to read Stark table '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed Stark table '{}' at line {line}: {message}", path.display())]
    Format {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error("Stark table '{}' has no column {column} ({available} columns)", path.display())]
    MissingColumn {
        path: PathBuf,
        column: usize,
        available: usize,
    },
    #[error("Stark table stock for {axis} is empty")]
    EmptyStock { axis: TableAxis },
    #[error("Stark table query for {axis} must be finite, got {value}")]
    InvalidQuery { axis: TableAxis, value: f64 },
    #[error("Stark profile interpolation failed: {message}")]
    Interpolation { message: String },
    #[error("Stark table cache lock is poisoned")]
    CachePoisoned,
}

/// Whether tabulated hydrogen profiles are used when the inputs allow, or
/// the power-law Lorentzian fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarkAccuracy {
    #[default]
    Tabulated,
    Fast,
}

/// Lines with a Stark model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StarkLine {
    Hydrogen(HydrogenLine),
    Helium(HeliumLine),
    Griem(GriemLine),
}

impl StarkLine {
    pub fn identify(transition: &Transition) -> Option<Self> {
        let emitter = &transition.emitter;
        let nominal = transition.nominal_wavelength();
        if emitter.is("H", 0) {
            return HydrogenLine::from_nominal_wavelength(nominal).map(Self::Hydrogen);
        }
        if emitter.is("He", 0) {
            return HeliumLine::from_nominal_wavelength(nominal).map(Self::Helium);
        }
        GriemLine::identify(transition).map(Self::Griem)
    }
}

impl Display for StarkLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hydrogen(line) => line.fmt(f),
            Self::Helium(line) => line.fmt(f),
            Self::Griem(line) => line.fmt(f),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StarkModel {
    Tabulated,
    PowerLaw,
    Griem,
}

/// Plasma inputs of one Stark evaluation. Densities in m^-3, temperatures
/// in K.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarkRequest<'a> {
    pub electron_density: f64,
    pub electron_temperature: Option<f64>,
    pub perturber: Option<&'a SpeciesProperties>,
    pub accuracy: StarkAccuracy,
}

impl<'a> StarkRequest<'a> {
    pub fn new(electron_density: f64) -> Self {
        Self {
            electron_density,
            electron_temperature: None,
            perturber: None,
            accuracy: StarkAccuracy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StarkProfile {
    pub line: StarkLine,
    pub model: StarkModel,
    /// Area-normalized profile on the requested axis.
    pub values: Vec<f64>,
    pub clamps: Vec<ClampNotice>,
}

/// Result of a Stark evaluation for a supported line.
#[derive(Debug, Clone, PartialEq)]
pub enum StarkOutcome {
    Profile(StarkProfile),
    /// The line has a model but it needs the electron temperature.
    MissingElectronTemperature { line: StarkLine },
}

/// Mass ratio used by the tables: reduced emitter/perturber mass (u) times
/// the electron to perturber temperature ratio; 1 without a perturber.
/// A perturber at 0 K gives an infinite ratio, which the grid clamps.
pub fn mass_ratio(
    emitter_mass: f64,
    perturber: Option<&SpeciesProperties>,
    electron_temperature: f64,
) -> f64 {
    let Some(perturber) = perturber else {
        return 1.0;
    };
    let temperature_ratio = match perturber.temperature {
        Some(temperature) if temperature == electron_temperature => 1.0,
        Some(temperature) if temperature <= 0.0 => f64::INFINITY,
        Some(temperature) => electron_temperature / temperature,
        None => 1.0,
    };
    reduced_mass(emitter_mass, perturber.mass) * temperature_ratio
}

/// Tabulated-profile engine over an injected table cache.
#[derive(Debug, Clone)]
pub struct StarkTableInterpolator {
    cache: Arc<StarkTableCache>,
    roots: TableRoots,
}

impl StarkTableInterpolator {
    pub fn new(cache: Arc<StarkTableCache>, roots: TableRoots) -> Self {
        Self { cache, roots }
    }

    pub fn cache(&self) -> &Arc<StarkTableCache> {
        &self.cache
    }

    pub fn roots(&self) -> &TableRoots {
        &self.roots
    }

    pub fn hydrogen(
        &self,
        line: HydrogenLine,
        electron_density: f64,
        electron_temperature: f64,
        mass_ratio: f64,
    ) -> LineShapeResult<InterpolatedProfile> {
        let root = required_root(self.roots.hydrogen.as_deref(), "table_roots.hydrogen")?;
        Ok(HydrogenGrid::new(&self.cache, root, line).profile(
            electron_density,
            electron_temperature,
            mass_ratio,
        )?)
    }

    pub fn helium(
        &self,
        line: HeliumLine,
        electron_density: f64,
        electron_temperature: f64,
        mass_ratio: f64,
    ) -> LineShapeResult<InterpolatedProfile> {
        let root = required_root(self.roots.helium.as_deref(), "table_roots.helium")?;
        Ok(HeliumGrid::new(&self.cache, root, line).profile(
            electron_density,
            electron_temperature,
            mass_ratio,
        )?)
    }
}

fn required_root<'a>(root: Option<&'a Path>, key: &str) -> LineShapeResult<&'a Path> {
    root.ok_or_else(|| {
        LineShapeError::missing_data(
            "DATA.STARK_TABLE_ROOT",
            format!("tabulated Stark profiles need '{key}' to be configured"),
        )
    })
}

/// Stark profile of `transition` on `axis`, centred on `center`.
///
/// Hydrogen uses the tables when an electron temperature is known and
/// `accuracy` allows, otherwise the power-law fit. Helium always uses the
/// tables; O I and Ar I use the Griem model (its shift is not applied).
pub fn stark_profile(
    interpolator: &StarkTableInterpolator,
    transition: &Transition,
    axis: &WavelengthAxis,
    center: f64,
    request: StarkRequest<'_>,
) -> LineShapeResult<StarkOutcome> {
    let line = StarkLine::identify(transition).ok_or_else(|| {
        LineShapeError::unsupported_line(
            "INPUT.STARK_LINE",
            format!(
                "no Stark model for {} {} at {} nm",
                transition.emitter.symbol, transition.emitter.charge, transition.wavelength
            ),
        )
    })?;
    if !request.electron_density.is_finite() || request.electron_density <= 0.0 {
        return Err(LineShapeError::invalid_parameter(
            "INPUT.ELECTRON_DENSITY",
            format!(
                "Stark broadening needs a finite electron density > 0, got {}",
                request.electron_density
            ),
        ));
    }

    let temperature = request.electron_temperature;
    let lorentz_profile = |model: StarkModel, width: f64| {
        StarkOutcome::Profile(StarkProfile {
            line,
            model,
            values: lorentzian(axis.points(), center, width),
            clamps: Vec::new(),
        })
    };

    let mass = transition.emitter.mass;
    match line {
        StarkLine::Hydrogen(hydrogen) => {
            let fast = request.accuracy == StarkAccuracy::Fast || temperature.is_none();
            if fast && let Some(width) = hydrogen.power_law_width(request.electron_density) {
                return Ok(lorentz_profile(StarkModel::PowerLaw, width));
            }
            let Some(temperature) = temperature else {
                return Ok(StarkOutcome::MissingElectronTemperature { line });
            };
            let mu = mass_ratio(mass, request.perturber, temperature);
            let interpolated =
                interpolator.hydrogen(hydrogen, request.electron_density, temperature, mu)?;
            Ok(StarkOutcome::Profile(placed_profile(
                line,
                interpolated,
                axis,
                center,
            )?))
        }
        StarkLine::Helium(helium) => {
            let Some(temperature) = temperature else {
                return Ok(StarkOutcome::MissingElectronTemperature { line });
            };
            let mu = mass_ratio(mass, request.perturber, temperature);
            let interpolated =
                interpolator.helium(helium, request.electron_density, temperature, mu)?;
            Ok(StarkOutcome::Profile(placed_profile(
                line,
                interpolated,
                axis,
                center,
            )?))
        }
        StarkLine::Griem(griem) => {
            let Some(temperature) = temperature else {
                return Ok(StarkOutcome::MissingElectronTemperature { line });
            };
            let result = width_shift(griem, request.electron_density, temperature);
            Ok(lorentz_profile(StarkModel::Griem, result.width))
        }
    }
}

fn placed_profile(
    line: StarkLine,
    interpolated: InterpolatedProfile,
    axis: &WavelengthAxis,
    center: f64,
) -> LineShapeResult<StarkProfile> {
    let (x, y) = interpolated.profile.to_wavelength(center, 1.0, 1.0);
    let values = interpolate_zero_fill(&x, &y, axis.points())?;
    Ok(StarkProfile {
        line,
        model: StarkModel::Tabulated,
        values,
        clamps: interpolated.clamps,
    })
}
