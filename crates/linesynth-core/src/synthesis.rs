//! Line-shape synthesis: resolves conditions, evaluates every active
//! broadening kernel on a shared fine axis, convolves them with the
//! instrument response and returns an area-normalized profile on the
//! caller's axis.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::config::SynthesisConfig;
use crate::domain::{
    LineShapeError, LineShapeResult, Mechanism, MechanismSwitch, PlasmaConditions,
    ResolvedConditions, Transition,
};
use crate::instrument::InstrumentFunction;
use crate::kernels::van_der_waals::shift as van_der_waals_shift;
use crate::kernels::{
    DopplerInput, VanDerWaalsGap, VanDerWaalsInput, ZeemanInput, doppler_profile, impulse,
    is_balmer_alpha, van_der_waals_profile, zeeman_components, zeeman_pattern,
};
use crate::numerics::{
    WavelengthAxis, convolve_same, interpolate_zero_fill, peak_normalized, stable_sum,
    upsample_axis,
};
use crate::stark::{
    ClampNotice, StarkLine, StarkOutcome, StarkRequest, StarkTableCache, StarkTableInterpolator,
    stark_profile,
};

/// Intermediate profiles exposed for inspection, all on the fine axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProfileComponent {
    ThermalDoppler,
    SputteredDoppler,
    Doppler,
    Stark,
    Zeeman,
    VanDerWaals,
    Instrument,
    FineComposite,
}

impl ProfileComponent {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ThermalDoppler => "thermal_doppler",
            Self::SputteredDoppler => "sputtered_doppler",
            Self::Doppler => "doppler",
            Self::Stark => "stark",
            Self::Zeeman => "zeeman",
            Self::VanDerWaals => "van_der_waals",
            Self::Instrument => "instrument",
            Self::FineComposite => "fine_composite",
        }
    }
}

impl Display for ProfileComponent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Non-fatal conditions met during a synthesis. Each one names the input
/// that was missing or adjusted.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisWarning {
    /// A mechanism switched on explicitly lacks its defining parameter.
    MechanismParameterMissing {
        mechanism: Mechanism,
        parameter: &'static str,
    },
    MissingQuantumNumber {
        mechanism: Mechanism,
        missing: Vec<&'static str>,
    },
    /// Stark broadening was forced on for a line without a model.
    UnsupportedStarkLine { species: String, wavelength: f64 },
    DomainClamp(ClampNotice),
    /// Binding energy given with a temperature but no thermal weight.
    IgnoredBindingEnergy,
    MissingElectronTemperature { line: StarkLine },
    VanDerWaalsUnavailable(VanDerWaalsGap),
}

impl Display for SynthesisWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MechanismParameterMissing {
                mechanism,
                parameter,
            } => write!(
                f,
                "{mechanism} broadening is switched on but '{parameter}' is not set; skipped"
            ),
            Self::MissingQuantumNumber { mechanism, missing } => write!(
                f,
                "{mechanism} broadening needs {} on the transition; skipped",
                missing.join(", ")
            ),
            Self::UnsupportedStarkLine {
                species,
                wavelength,
            } => write!(
                f,
                "no Stark model for {species} at {wavelength} nm; Stark broadening skipped"
            ),
            Self::DomainClamp(notice) => notice.fmt(f),
            Self::IgnoredBindingEnergy => f.write_str(
                "binding energy ignored: mixing sputtered and thermal Doppler needs 'thermal_weight'",
            ),
            Self::MissingElectronTemperature { line } => write!(
                f,
                "Stark model for {line} needs 'electron_temperature'; skipped"
            ),
            Self::VanDerWaalsUnavailable(gap) => {
                write!(f, "van der Waals broadening skipped: {gap}")
            }
        }
    }
}

/// One synthesis call. `center` defaults to the transition wavelength.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisInput<'a> {
    pub transition: &'a Transition,
    pub axis: &'a [f64],
    pub area: f64,
    pub center: Option<f64>,
    pub conditions: PlasmaConditions,
}

impl<'a> SynthesisInput<'a> {
    pub fn new(transition: &'a Transition, axis: &'a [f64], area: f64) -> Self {
        Self {
            transition,
            axis,
            area,
            center: None,
            conditions: PlasmaConditions::default(),
        }
    }

    pub fn with_center(mut self, center: f64) -> Self {
        self.center = Some(center);
        self
    }

    pub fn with_conditions(mut self, conditions: PlasmaConditions) -> Self {
        self.conditions = conditions;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOutput {
    /// The caller's wavelength axis in nm.
    pub wavelengths: Vec<f64>,
    /// Intensities with `sum * resolution == area`.
    pub intensities: Vec<f64>,
    /// Fine axis the diagnostics are sampled on.
    pub fine_wavelengths: Vec<f64>,
    /// Peak-normalized intermediate profiles.
    pub diagnostics: BTreeMap<ProfileComponent, Vec<f64>>,
    /// Mechanisms that contributed, in convolution order.
    pub mechanisms: Vec<Mechanism>,
    pub warnings: Vec<SynthesisWarning>,
}

/// Forward model of an emission line under plasma conditions.
#[derive(Debug, Clone)]
pub struct LineProfileSynthesizer {
    config: SynthesisConfig,
    conditions: PlasmaConditions,
    interpolator: StarkTableInterpolator,
}

impl LineProfileSynthesizer {
    pub fn new(config: SynthesisConfig, cache: Arc<StarkTableCache>) -> Self {
        let interpolator = StarkTableInterpolator::new(cache, config.table_roots.clone());
        Self {
            config,
            conditions: PlasmaConditions::default(),
            interpolator,
        }
    }

    /// Instance conditions, layered between the config defaults and the
    /// per-call conditions.
    pub fn with_conditions(mut self, conditions: PlasmaConditions) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    pub fn conditions(&self) -> &PlasmaConditions {
        &self.conditions
    }

    pub fn set_conditions(&mut self, conditions: PlasmaConditions) {
        self.conditions = conditions;
    }

    pub fn interpolator(&self) -> &StarkTableInterpolator {
        &self.interpolator
    }

    pub fn synthesize(
        &self,
        input: SynthesisInput<'_>,
        instrument: &dyn InstrumentFunction,
    ) -> LineShapeResult<SynthesisOutput> {
        let transition = input.transition;
        transition.validate()?;
        let axis = WavelengthAxis::new(input.axis.to_vec())?;
        if !input.area.is_finite() || input.area < 0.0 {
            return Err(LineShapeError::invalid_parameter(
                "INPUT.AREA",
                format!("line area must be finite and >= 0, got {}", input.area),
            ));
        }
        let center = input.center.unwrap_or(transition.wavelength);
        if !center.is_finite() || center <= 0.0 {
            return Err(LineShapeError::invalid_parameter(
                "INPUT.CENTER",
                format!("line center must be finite and > 0 nm, got {center}"),
            ));
        }

        let resolved = PlasmaConditions::resolve_layers(
            &input.conditions,
            &self.conditions,
            &self.config.defaults,
        )?;

        let oversampling = self.config.effective_oversampling();
        let fine = upsample_axis(&axis, oversampling)?;
        let fine_resolution = fine.resolution();
        tracing::debug!(
            points = axis.len(),
            fine_points = fine.len(),
            oversampling,
            "built fine wavelength axis"
        );

        let mut pass = MechanismPass {
            synthesizer: self,
            transition,
            resolved: &resolved,
            fine: &fine,
            kernel_center: fine.middle(),
            warnings: Vec::new(),
            diagnostics: BTreeMap::new(),
            shift: 0.0,
        };
        let mut kernels = Vec::new();
        for mechanism in Mechanism::ORDER {
            if !pass.is_active(mechanism) {
                continue;
            }
            if let Some(kernel) = pass.kernel(mechanism)? {
                kernels.push((mechanism, kernel));
            }
        }
        let mechanisms: Vec<Mechanism> = kernels.iter().map(|(mechanism, _)| *mechanism).collect();
        tracing::debug!(?mechanisms, shift = pass.shift, "resolved broadening mechanisms");

        let response = instrument.response(fine.points(), center + pass.shift, transition);
        if response.len() != fine.len() {
            return Err(LineShapeError::computation(
                "RUN.INSTRUMENT",
                format!(
                    "instrument response has {} samples for a {}-point axis",
                    response.len(),
                    fine.len()
                ),
            ));
        }
        pass.record(ProfileComponent::Instrument, &response);

        let mut composite = response;
        for (_, kernel) in &kernels {
            composite = convolve_same(&composite, kernel)?
                .into_iter()
                .map(|value| (value * fine_resolution).max(0.0))
                .collect();
        }
        pass.record(ProfileComponent::FineComposite, &composite);

        let scaled: Vec<f64> = composite.iter().map(|value| value * input.area).collect();
        let mut intensities = interpolate_zero_fill(fine.points(), &scaled, axis.points())?;
        normalize_area(&mut intensities, axis.resolution(), input.area)?;

        let MechanismPass {
            warnings,
            diagnostics,
            ..
        } = pass;
        for warning in &warnings {
            tracing::warn!("{warning}");
        }

        Ok(SynthesisOutput {
            wavelengths: axis.into_points(),
            intensities,
            fine_wavelengths: fine.into_points(),
            diagnostics,
            mechanisms,
            warnings,
        })
    }
}

/// Rescales `values` so that `sum * resolution == area`.
fn normalize_area(values: &mut [f64], resolution: f64, area: f64) -> LineShapeResult<()> {
    if area == 0.0 {
        values.iter_mut().for_each(|value| *value = 0.0);
        return Ok(());
    }
    let total = stable_sum(values) * resolution;
    if !total.is_finite() || total <= 0.0 {
        return Err(LineShapeError::computation(
            "RUN.NORMALIZATION",
            format!(
                "profile has no resolvable area on the wavelength axis (integral {total}); \
                 check that the line center lies inside the axis"
            ),
        ));
    }
    let scale = area / total;
    values.iter_mut().for_each(|value| *value *= scale);
    Ok(())
}

/// State of one synthesis while the mechanism kernels are evaluated.
struct MechanismPass<'a> {
    synthesizer: &'a LineProfileSynthesizer,
    transition: &'a Transition,
    resolved: &'a ResolvedConditions,
    fine: &'a WavelengthAxis,
    kernel_center: f64,
    warnings: Vec<SynthesisWarning>,
    diagnostics: BTreeMap<ProfileComponent, Vec<f64>>,
    shift: f64,
}

impl MechanismPass<'_> {
    fn is_active(&mut self, mechanism: Mechanism) -> bool {
        match self.resolved.switch(mechanism) {
            MechanismSwitch::Off => false,
            MechanismSwitch::Auto => self.resolved.has_defining_parameter(mechanism),
            MechanismSwitch::On => {
                let present = self.resolved.has_defining_parameter(mechanism);
                if !present {
                    self.warnings
                        .push(SynthesisWarning::MechanismParameterMissing {
                            mechanism,
                            parameter: defining_parameter(mechanism),
                        });
                }
                present
            }
        }
    }

    fn kernel(&mut self, mechanism: Mechanism) -> LineShapeResult<Option<Vec<f64>>> {
        match mechanism {
            Mechanism::Doppler => Ok(self.doppler()),
            Mechanism::Stark => self.stark(),
            Mechanism::Zeeman => self.zeeman(),
            Mechanism::VanDerWaals => Ok(self.van_der_waals()),
        }
    }

    fn record(&mut self, component: ProfileComponent, values: &[f64]) {
        self.diagnostics.insert(component, peak_normalized(values));
    }

    fn doppler(&mut self) -> Option<Vec<f64>> {
        let resolved = self.resolved;
        let input = DopplerInput {
            temperature: resolved.temperature,
            binding_energy: resolved.binding_energy,
            thermal_weight: resolved.thermal_weight,
            symmetric_sputtering: resolved.symmetric_sputtering,
            ..DopplerInput::new(
                self.fine.points(),
                self.kernel_center,
                self.transition.emitter.mass,
            )
        };
        let profile = doppler_profile(input)?;
        if profile.ignored_binding_energy {
            self.warnings.push(SynthesisWarning::IgnoredBindingEnergy);
        }
        if let Some(thermal) = &profile.thermal {
            self.record(ProfileComponent::ThermalDoppler, thermal);
        }
        if let Some(sputtered) = &profile.sputtered {
            self.record(ProfileComponent::SputteredDoppler, sputtered);
        }
        self.record(ProfileComponent::Doppler, &profile.combined);
        Some(profile.combined)
    }

    fn stark(&mut self) -> LineShapeResult<Option<Vec<f64>>> {
        let resolved = self.resolved;
        let Some(electron_density) = resolved.electron_density else {
            return Ok(None);
        };
        if StarkLine::identify(self.transition).is_none() {
            if resolved.stark == MechanismSwitch::On {
                self.warnings.push(SynthesisWarning::UnsupportedStarkLine {
                    species: self.transition.emitter.symbol.clone(),
                    wavelength: self.transition.wavelength,
                });
            }
            return Ok(None);
        }
        if electron_density == 0.0 {
            let kernel = impulse(self.fine.points(), self.kernel_center);
            self.record(ProfileComponent::Stark, &kernel);
            return Ok(Some(kernel));
        }

        let request = StarkRequest {
            electron_temperature: resolved.electron_temperature,
            perturber: resolved.perturber.as_ref(),
            accuracy: self.synthesizer.config.stark_accuracy,
            ..StarkRequest::new(electron_density)
        };
        let outcome = stark_profile(
            &self.synthesizer.interpolator,
            self.transition,
            self.fine,
            self.kernel_center,
            request,
        )?;
        match outcome {
            StarkOutcome::Profile(profile) => {
                self.warnings.extend(
                    profile
                        .clamps
                        .into_iter()
                        .map(SynthesisWarning::DomainClamp),
                );
                self.record(ProfileComponent::Stark, &profile.values);
                Ok(Some(profile.values))
            }
            StarkOutcome::MissingElectronTemperature { line } => {
                self.warnings
                    .push(SynthesisWarning::MissingElectronTemperature { line });
                Ok(None)
            }
        }
    }

    fn zeeman(&mut self) -> LineShapeResult<Option<Vec<f64>>> {
        let Some(magnetic_field) = self.resolved.magnetic_field else {
            return Ok(None);
        };
        let transition = self.transition;
        let (Some(upper_j), Some(lower_j), Some(upper_g), Some(lower_g)) = (
            transition.upper_j,
            transition.lower_j,
            transition.upper_g,
            transition.lower_g,
        ) else {
            let missing = [
                ("upper_j", transition.upper_j),
                ("lower_j", transition.lower_j),
                ("upper_g", transition.upper_g),
                ("lower_g", transition.lower_g),
            ]
            .into_iter()
            .filter_map(|(name, value)| value.is_none().then_some(name))
            .collect();
            self.warnings.push(SynthesisWarning::MissingQuantumNumber {
                mechanism: Mechanism::Zeeman,
                missing,
            });
            return Ok(None);
        };

        let components = zeeman_components(ZeemanInput::new(
            transition.wavelength,
            magnetic_field,
            upper_j,
            lower_j,
            upper_g,
            lower_g,
        ))?;
        let resolution = self.fine.resolution();
        let kernel: Vec<f64> = zeeman_pattern(
            self.fine,
            self.kernel_center,
            &components,
            self.resolved.zeeman_sigma_only,
        )
        .into_iter()
        .map(|value| value / resolution)
        .collect();
        self.record(ProfileComponent::Zeeman, &kernel);
        Ok(Some(kernel))
    }

    fn van_der_waals(&mut self) -> Option<Vec<f64>> {
        let density = self.resolved.neutral_density?;
        let evaluated = VanDerWaalsInput::from_transition(
            self.transition,
            self.resolved.perturber.as_ref(),
            density,
        )
        .and_then(|input| {
            let kernel = van_der_waals_profile(
                self.fine.points(),
                self.kernel_center,
                &input,
                is_balmer_alpha(self.transition),
            )?;
            let shift = if self.resolved.apply_van_der_waals_shift {
                van_der_waals_shift(&input)?
            } else {
                0.0
            };
            Ok((kernel, shift))
        });

        match evaluated {
            Ok((kernel, shift)) => {
                self.shift += shift;
                self.record(ProfileComponent::VanDerWaals, &kernel);
                Some(kernel)
            }
            Err(gap) => {
                self.warnings
                    .push(SynthesisWarning::VanDerWaalsUnavailable(gap));
                None
            }
        }
    }
}

fn defining_parameter(mechanism: Mechanism) -> &'static str {
    match mechanism {
        Mechanism::Doppler => "temperature or binding_energy",
        Mechanism::Stark => "electron_density",
        Mechanism::Zeeman => "magnetic_field",
        Mechanism::VanDerWaals => "neutral_density",
    }
}
