use super::CliError;
use super::helpers::*;
use linesynth_core::common::format_spectroscopic_name;
use linesynth_core::kernels::{ZeemanInput, zeeman_components};
use linesynth_core::{
    LinePreset, LineProfileSynthesizer, LineShapeError, StarkTableCache, SynthesisInput,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(clap::Args)]
pub(super) struct SynthesizeArgs {
    /// JSON run file
    #[arg(long)]
    config: PathBuf,

    /// Write the two-column profile here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write fine-axis diagnostics and warnings as JSON
    #[arg(long)]
    diagnostics: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct ZeemanArgs {
    /// JSON run file with the transition and magnetic field
    #[arg(long)]
    config: PathBuf,

    /// Print the components as JSON
    #[arg(long)]
    json: bool,
}

pub(super) fn run_synthesize_command(args: SynthesizeArgs) -> Result<i32, CliError> {
    let loaded = load_run_config(&args.config)?;
    let config = loaded.synthesis_config()?;
    let transition = loaded.transition()?;
    let axis = loaded.axis()?;

    let synthesizer = LineProfileSynthesizer::new(config, Arc::new(StarkTableCache::new()));
    let mut input = SynthesisInput::new(&transition, axis.points(), loaded.run.area)
        .with_conditions(loaded.run.conditions.clone());
    if let Some(center) = loaded.run.center {
        input = input.with_center(center);
    }
    let output = synthesizer.synthesize(input, &loaded.run.instrument)?;

    for warning in &output.warnings {
        eprintln!("WARNING: {warning}");
    }

    let rendered = render_profile(&output);
    match &args.output {
        Some(path) => {
            write_output(path, &rendered)?;
            tracing::info!("Wrote profile to {:?}", path);
            println!("Profile: {}", path.display());
        }
        None => print!("{rendered}"),
    }

    if let Some(path) = &args.diagnostics {
        let components: BTreeMap<&str, &Vec<f64>> = output
            .diagnostics
            .iter()
            .map(|(component, values)| (component.as_str(), values))
            .collect();
        let warnings: Vec<String> = output.warnings.iter().map(ToString::to_string).collect();
        let mechanisms: Vec<&str> = output.mechanisms.iter().map(|m| m.as_str()).collect();
        let report = json!({
            "mechanisms": mechanisms,
            "warnings": warnings,
            "fine_wavelengths": output.fine_wavelengths,
            "components": components,
        });
        let serialized = serde_json::to_string_pretty(&report)
            .map_err(|source| CliError::Internal(source.into()))?;
        write_output(path, &serialized)?;
        tracing::info!("Wrote diagnostics to {:?}", path);
    }

    Ok(0)
}

pub(super) fn run_zeeman_command(args: ZeemanArgs) -> Result<i32, CliError> {
    let loaded = load_run_config(&args.config)?;
    let config = loaded.synthesis_config()?;
    let transition = loaded.transition()?;
    let conditions = loaded.run.conditions.layered_over(&config.defaults);

    let magnetic_field = conditions.magnetic_field.ok_or_else(|| {
        LineShapeError::invalid_parameter(
            "INPUT.MAGNETIC_FIELD",
            "zeeman command needs 'conditions.magnetic_field'",
        )
    })?;
    let (Some(upper_j), Some(lower_j), Some(upper_g), Some(lower_g)) = (
        transition.upper_j,
        transition.lower_j,
        transition.upper_g,
        transition.lower_g,
    ) else {
        return Err(LineShapeError::invalid_parameter(
            "INPUT.QUANTUM_NUMBERS",
            "zeeman command needs upper_j, lower_j, upper_g and lower_g on the transition",
        )
        .into());
    };

    let components = zeeman_components(ZeemanInput::new(
        transition.wavelength,
        magnetic_field,
        upper_j,
        lower_j,
        upper_g,
        lower_g,
    ))
    .map_err(LineShapeError::from)?;

    if args.json {
        let serialized = serde_json::to_string_pretty(&components)
            .map_err(|source| CliError::Internal(source.into()))?;
        println!("{serialized}");
        return Ok(0);
    }

    println!(
        "{:<12} {:>6} {:>6} {:>14} {:>12} {:>10}",
        "polarization", "m_up", "m_low", "wavelength_nm", "offset_nm", "strength"
    );
    for component in &components {
        println!(
            "{:<12} {:>6.1} {:>6.1} {:>14.6} {:>12.3e} {:>10.4}",
            component.polarization.as_str(),
            component.upper_m,
            component.lower_m,
            component.wavelength,
            component.offset,
            component.intensity
        );
    }
    Ok(0)
}

pub(super) fn run_presets_command() -> Result<i32, CliError> {
    for preset in LinePreset::ALL {
        let transition = preset.transition()?;
        let species =
            format_spectroscopic_name(&transition.emitter.symbol, transition.emitter.charge)
                .unwrap_or_else(|| transition.emitter.symbol.clone());
        println!(
            "{:<16} {:>10.3} nm  {species}",
            preset.as_str(),
            transition.wavelength
        );
    }
    Ok(0)
}
