use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use super::errors::{LineShapeError, LineShapeResult};
use super::transition::{PerturberSpec, SpeciesProperties};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mechanism {
    Doppler,
    Stark,
    Zeeman,
    VanDerWaals,
}

impl Mechanism {
    /// Convolution order after the instrument response.
    pub const ORDER: [Mechanism; 4] = [
        Mechanism::Doppler,
        Mechanism::Stark,
        Mechanism::Zeeman,
        Mechanism::VanDerWaals,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Doppler => "doppler",
            Self::Stark => "stark",
            Self::Zeeman => "zeeman",
            Self::VanDerWaals => "van_der_waals",
        }
    }
}

impl Display for Mechanism {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MechanismSwitch {
    #[default]
    Auto,
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MechanismSwitches {
    #[serde(default)]
    pub doppler: Option<MechanismSwitch>,
    #[serde(default)]
    pub stark: Option<MechanismSwitch>,
    #[serde(default)]
    pub zeeman: Option<MechanismSwitch>,
    #[serde(default)]
    pub van_der_waals: Option<MechanismSwitch>,
}

impl MechanismSwitches {
    pub fn all(switch: MechanismSwitch) -> Self {
        Self {
            doppler: Some(switch),
            stark: Some(switch),
            zeeman: Some(switch),
            van_der_waals: Some(switch),
        }
    }

    pub fn get(&self, mechanism: Mechanism) -> Option<MechanismSwitch> {
        match mechanism {
            Mechanism::Doppler => self.doppler,
            Mechanism::Stark => self.stark,
            Mechanism::Zeeman => self.zeeman,
            Mechanism::VanDerWaals => self.van_der_waals,
        }
    }

    pub fn set(&mut self, mechanism: Mechanism, switch: MechanismSwitch) {
        let slot = match mechanism {
            Mechanism::Doppler => &mut self.doppler,
            Mechanism::Stark => &mut self.stark,
            Mechanism::Zeeman => &mut self.zeeman,
            Mechanism::VanDerWaals => &mut self.van_der_waals,
        };
        *slot = Some(switch);
    }

    fn layered_over(&self, base: &Self) -> Self {
        Self {
            doppler: self.doppler.or(base.doppler),
            stark: self.stark.or(base.stark),
            zeeman: self.zeeman.or(base.zeeman),
            van_der_waals: self.van_der_waals.or(base.van_der_waals),
        }
    }
}

/// Physical conditions for one evaluation. Every field is optional; partial
/// population is the normal case.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlasmaConditions {
    /// Gas (emitter kinetic) temperature in K.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Electron density in m^-3.
    #[serde(default)]
    pub electron_density: Option<f64>,
    /// Electron temperature in K.
    #[serde(default)]
    pub electron_temperature: Option<f64>,
    /// Magnetic field in T.
    #[serde(default)]
    pub magnetic_field: Option<f64>,
    /// Neutral perturber density in m^-3.
    #[serde(default)]
    pub neutral_density: Option<f64>,
    /// Surface binding energy of sputtered emitters in eV.
    #[serde(default)]
    pub binding_energy: Option<f64>,
    /// Weight of the thermal Doppler component when mixed with the sputtered one.
    #[serde(default)]
    pub thermal_weight: Option<f64>,
    #[serde(default)]
    pub perturber: Option<PerturberSpec>,
    #[serde(default)]
    pub switches: MechanismSwitches,
    #[serde(default)]
    pub symmetric_sputtering: Option<bool>,
    #[serde(default)]
    pub apply_van_der_waals_shift: Option<bool>,
    #[serde(default)]
    pub zeeman_sigma_only: Option<bool>,
}

impl PlasmaConditions {
    /// Field-wise merge where values present in `self` win over `base`.
    pub fn layered_over(&self, base: &PlasmaConditions) -> PlasmaConditions {
        PlasmaConditions {
            temperature: self.temperature.or(base.temperature),
            electron_density: self.electron_density.or(base.electron_density),
            electron_temperature: self.electron_temperature.or(base.electron_temperature),
            magnetic_field: self.magnetic_field.or(base.magnetic_field),
            neutral_density: self.neutral_density.or(base.neutral_density),
            binding_energy: self.binding_energy.or(base.binding_energy),
            thermal_weight: self.thermal_weight.or(base.thermal_weight),
            perturber: self.perturber.clone().or_else(|| base.perturber.clone()),
            switches: self.switches.layered_over(&base.switches),
            symmetric_sputtering: self.symmetric_sputtering.or(base.symmetric_sputtering),
            apply_van_der_waals_shift: self
                .apply_van_der_waals_shift
                .or(base.apply_van_der_waals_shift),
            zeeman_sigma_only: self.zeeman_sigma_only.or(base.zeeman_sigma_only),
        }
    }

    /// Merges call, instance and default layers once and validates the
    /// result into a flat record.
    pub fn resolve_layers(
        call: &PlasmaConditions,
        instance: &PlasmaConditions,
        defaults: &PlasmaConditions,
    ) -> LineShapeResult<ResolvedConditions> {
        call.layered_over(&instance.layered_over(defaults)).resolve()
    }

    pub fn resolve(&self) -> LineShapeResult<ResolvedConditions> {
        let temperature = non_negative("temperature", self.temperature)?;
        let electron_density = non_negative("electron_density", self.electron_density)?;
        let electron_temperature =
            non_negative("electron_temperature", self.electron_temperature)?;
        let magnetic_field = non_negative("magnetic_field", self.magnetic_field)?;
        let neutral_density = non_negative("neutral_density", self.neutral_density)?;
        let binding_energy = non_negative("binding_energy", self.binding_energy)?;
        let thermal_weight = non_negative("thermal_weight", self.thermal_weight)?;
        if let Some(weight) = thermal_weight
            && weight > 1.0
        {
            return Err(LineShapeError::invalid_parameter(
                "INPUT.THERMAL_WEIGHT",
                format!("thermal weight must lie in [0, 1], got {weight}"),
            ));
        }

        let perturber = self
            .perturber
            .as_ref()
            .map(|spec| spec.resolve(temperature, electron_temperature))
            .transpose()?;

        Ok(ResolvedConditions {
            temperature,
            electron_density,
            electron_temperature,
            magnetic_field,
            neutral_density,
            binding_energy,
            thermal_weight,
            perturber,
            doppler: self.switches.doppler.unwrap_or_default(),
            stark: self.switches.stark.unwrap_or_default(),
            zeeman: self.switches.zeeman.unwrap_or_default(),
            van_der_waals: self.switches.van_der_waals.unwrap_or_default(),
            symmetric_sputtering: self.symmetric_sputtering.unwrap_or(false),
            apply_van_der_waals_shift: self.apply_van_der_waals_shift.unwrap_or(false),
            zeeman_sigma_only: self.zeeman_sigma_only.unwrap_or(false),
        })
    }
}

/// Flat, validated parameter record produced once per call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConditions {
    pub temperature: Option<f64>,
    pub electron_density: Option<f64>,
    pub electron_temperature: Option<f64>,
    pub magnetic_field: Option<f64>,
    pub neutral_density: Option<f64>,
    pub binding_energy: Option<f64>,
    pub thermal_weight: Option<f64>,
    pub perturber: Option<SpeciesProperties>,
    pub doppler: MechanismSwitch,
    pub stark: MechanismSwitch,
    pub zeeman: MechanismSwitch,
    pub van_der_waals: MechanismSwitch,
    pub symmetric_sputtering: bool,
    pub apply_van_der_waals_shift: bool,
    pub zeeman_sigma_only: bool,
}

impl ResolvedConditions {
    pub fn switch(&self, mechanism: Mechanism) -> MechanismSwitch {
        match mechanism {
            Mechanism::Doppler => self.doppler,
            Mechanism::Stark => self.stark,
            Mechanism::Zeeman => self.zeeman,
            Mechanism::VanDerWaals => self.van_der_waals,
        }
    }

    /// Whether the parameter that defines `mechanism` is present.
    pub fn has_defining_parameter(&self, mechanism: Mechanism) -> bool {
        match mechanism {
            Mechanism::Doppler => self.temperature.is_some() || self.binding_energy.is_some(),
            Mechanism::Stark => self.electron_density.is_some(),
            Mechanism::Zeeman => self.magnetic_field.is_some(),
            Mechanism::VanDerWaals => self.neutral_density.is_some(),
        }
    }
}

fn non_negative(name: &'static str, value: Option<f64>) -> LineShapeResult<Option<f64>> {
    match value {
        Some(value) if !value.is_finite() || value < 0.0 => {
            Err(LineShapeError::invalid_parameter(
                "INPUT.CONDITION",
                format!("plasma condition '{name}' must be finite and >= 0, got {value}"),
            ))
        }
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::{Mechanism, MechanismSwitch, MechanismSwitches, PlasmaConditions};
    use crate::domain::LineShapeErrorCategory;

    #[test]
    fn call_values_override_instance_values_override_defaults() {
        let defaults = PlasmaConditions {
            temperature: Some(300.0),
            electron_temperature: Some(10_000.0),
            apply_van_der_waals_shift: Some(true),
            ..PlasmaConditions::default()
        };
        let instance = PlasmaConditions {
            temperature: Some(1_000.0),
            electron_density: Some(1.0e22),
            ..PlasmaConditions::default()
        };
        let mut call = PlasmaConditions {
            electron_density: Some(1.0e23),
            ..PlasmaConditions::default()
        };
        call.switches.set(Mechanism::Zeeman, MechanismSwitch::Off);

        let resolved =
            PlasmaConditions::resolve_layers(&call, &instance, &defaults).expect("resolve");
        assert_eq!(resolved.temperature, Some(1_000.0));
        assert_eq!(resolved.electron_density, Some(1.0e23));
        assert_eq!(resolved.electron_temperature, Some(10_000.0));
        assert!(resolved.apply_van_der_waals_shift);
        assert_eq!(resolved.zeeman, MechanismSwitch::Off);
        assert_eq!(resolved.stark, MechanismSwitch::Auto);
    }

    #[test]
    fn defining_parameters_follow_mechanisms() {
        let resolved = PlasmaConditions {
            binding_energy: Some(4.0),
            magnetic_field: Some(0.5),
            ..PlasmaConditions::default()
        }
        .resolve()
        .expect("resolve");

        assert!(resolved.has_defining_parameter(Mechanism::Doppler));
        assert!(resolved.has_defining_parameter(Mechanism::Zeeman));
        assert!(!resolved.has_defining_parameter(Mechanism::Stark));
        assert!(!resolved.has_defining_parameter(Mechanism::VanDerWaals));
    }

    #[test]
    fn negative_and_out_of_range_parameters_are_rejected() {
        let negative = PlasmaConditions {
            electron_density: Some(-1.0),
            ..PlasmaConditions::default()
        };
        let error = negative.resolve().expect_err("negative density");
        assert_eq!(error.category(), LineShapeErrorCategory::InvalidParameter);

        let weight = PlasmaConditions {
            thermal_weight: Some(1.5),
            ..PlasmaConditions::default()
        };
        assert!(weight.resolve().is_err());
    }

    #[test]
    fn switches_deserialize_from_snake_case() {
        let switches: MechanismSwitches =
            serde_json::from_str(r#"{"stark":"on","van_der_waals":"off"}"#).expect("json");
        assert_eq!(switches.get(Mechanism::Stark), Some(MechanismSwitch::On));
        assert_eq!(
            switches.get(Mechanism::VanDerWaals),
            Some(MechanismSwitch::Off)
        );
        assert_eq!(switches.get(Mechanism::Doppler), None);
        assert_eq!(MechanismSwitches::all(MechanismSwitch::Off).zeeman, Some(MechanismSwitch::Off));
    }
}
