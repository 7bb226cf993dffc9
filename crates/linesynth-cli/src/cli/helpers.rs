use super::CliError;
use anyhow::Context;
use linesynth_core::numerics::WavelengthAxis;
use linesynth_core::{
    InstrumentShape, LinePreset, LineShapeError, PlasmaConditions, SynthesisConfig,
    SynthesisOutput, Transition, load_synthesis_config,
};
use serde::Deserialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// One CLI run: the line, the axis and the conditions to evaluate.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RunConfig {
    /// Synthesizer config file, relative to the run file.
    #[serde(default)]
    pub config: Option<PathBuf>,
    /// Inline synthesizer config, used when `config` is absent.
    #[serde(default)]
    pub synthesis: Option<SynthesisConfig>,
    #[serde(default)]
    pub transition: Option<Transition>,
    #[serde(default)]
    pub preset: Option<LinePreset>,
    #[serde(default)]
    pub axis: Option<AxisSpec>,
    #[serde(default = "default_area")]
    pub area: f64,
    #[serde(default)]
    pub center: Option<f64>,
    #[serde(default)]
    pub conditions: PlasmaConditions,
    #[serde(default)]
    pub instrument: InstrumentShape,
}

fn default_area() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum AxisSpec {
    Stepped { start: f64, stop: f64, step: f64 },
    Points { points: Vec<f64> },
}

impl AxisSpec {
    pub(super) fn build(&self) -> Result<WavelengthAxis, CliError> {
        let axis = match self {
            Self::Stepped { start, stop, step } => WavelengthAxis::stepped(*start, *stop, *step),
            Self::Points { points } => WavelengthAxis::new(points.clone()),
        };
        axis.map_err(|error| CliError::Compute(error.into()))
    }
}

/// A parsed run file together with the directory it was read from.
pub(super) struct LoadedRun {
    pub run: RunConfig,
    pub base_dir: PathBuf,
}

pub(super) fn load_run_config(path: &Path) -> Result<LoadedRun, CliError> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read run file '{}'", path.display()))?;
    let run: RunConfig = serde_json::from_str(&source).map_err(|source| {
        CliError::Compute(LineShapeError::invalid_parameter(
            "INPUT.RUN_FILE",
            format!("failed to parse run file '{}': {source}", path.display()),
        ))
    })?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok(LoadedRun { run, base_dir })
}

impl LoadedRun {
    pub(super) fn synthesis_config(&self) -> Result<SynthesisConfig, CliError> {
        match (&self.run.config, &self.run.synthesis) {
            (Some(_), Some(_)) => Err(CliError::Usage(
                "run file may set either 'config' or 'synthesis', not both".to_string(),
            )),
            (Some(relative), None) => {
                let path = resolve_cli_path(&self.base_dir, relative);
                let config = load_synthesis_config(&path).map_err(LineShapeError::from)?;
                let config_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
                Ok(config.with_roots_relative_to(&config_dir))
            }
            (None, Some(inline)) => Ok(inline.clone().with_roots_relative_to(&self.base_dir)),
            (None, None) => Ok(SynthesisConfig::default()),
        }
    }

    pub(super) fn transition(&self) -> Result<Transition, CliError> {
        match (&self.run.transition, self.run.preset) {
            (Some(transition), None) => Ok(transition.clone()),
            (None, Some(preset)) => Ok(preset.transition()?),
            (Some(_), Some(_)) => Err(CliError::Usage(
                "run file may set either 'transition' or 'preset', not both".to_string(),
            )),
            (None, None) => Err(CliError::Usage(
                "run file must set 'transition' or 'preset'".to_string(),
            )),
        }
    }

    pub(super) fn axis(&self) -> Result<WavelengthAxis, CliError> {
        self.run
            .axis
            .as_ref()
            .ok_or_else(|| CliError::Usage("run file must set 'axis'".to_string()))?
            .build()
    }
}

pub(super) fn resolve_cli_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

pub(super) fn render_profile(output: &SynthesisOutput) -> String {
    let mut rendered = String::from("# wavelength_nm intensity\n");
    for (wavelength, intensity) in output.wavelengths.iter().zip(&output.intensities) {
        let _ = writeln!(rendered, "{wavelength:.6} {intensity:.9e}");
    }
    rendered
}

pub(super) fn write_output(path: &Path, contents: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
    }
    fs::write(path, contents)
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    Ok(())
}
