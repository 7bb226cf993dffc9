use linesynth_core::domain::{Mechanism, MechanismSwitch, MechanismSwitches, PerturberSpec};
use linesynth_core::kernels::{
    Polarization, ZeemanInput, gaussian, measured_fwhm, thermal_fwhm, zeeman_components,
};
use linesynth_core::numerics::WavelengthAxis;
use linesynth_core::synthesis::ProfileComponent;
use linesynth_core::{
    InstrumentShape, LinePreset, LineProfileSynthesizer, PlasmaConditions, StarkAccuracy,
    StarkTableCache, SynthesisConfig, SynthesisInput,
};
use std::sync::Arc;

fn synthesizer(accuracy: StarkAccuracy) -> LineProfileSynthesizer {
    let config = SynthesisConfig {
        stark_accuracy: accuracy,
        ..SynthesisConfig::default()
    };
    LineProfileSynthesizer::new(config, Arc::new(StarkTableCache::new()))
}

fn only(mechanism: Mechanism) -> MechanismSwitches {
    let mut switches = MechanismSwitches::all(MechanismSwitch::Off);
    switches.set(mechanism, MechanismSwitch::Auto);
    switches
}

fn integral(values: &[f64], resolution: f64) -> f64 {
    values.iter().sum::<f64>() * resolution
}

#[test]
fn area_is_preserved_for_every_mechanism_mix() {
    let transition = LinePreset::Oxygen777.transition().expect("preset");
    let axis = WavelengthAxis::stepped(776.4, 778.0, 0.01).expect("axis");
    let full = PlasmaConditions {
        temperature: Some(3_000.0),
        electron_density: Some(1.0e22),
        electron_temperature: Some(10_000.0),
        magnetic_field: Some(1.0),
        neutral_density: Some(1.0e25),
        perturber: Some(PerturberSpec::Named("Ar I".to_string())),
        ..PlasmaConditions::default()
    };

    let mut mixes: Vec<MechanismSwitches> = Mechanism::ORDER.into_iter().map(only).collect();
    mixes.push(MechanismSwitches::all(MechanismSwitch::Auto));
    mixes.push(MechanismSwitches::all(MechanismSwitch::Off));

    let synthesizer = synthesizer(StarkAccuracy::Tabulated);
    for (area, switches) in [0.5, 1.0, 7.25].into_iter().cycle().zip(mixes) {
        let conditions = PlasmaConditions {
            switches,
            ..full.clone()
        };
        let output = synthesizer
            .synthesize(
                SynthesisInput::new(&transition, axis.points(), area).with_conditions(conditions),
                &InstrumentShape::Gaussian { fwhm: 0.02 },
            )
            .expect("synthesis should succeed");

        let measured = integral(&output.intensities, axis.resolution());
        assert!(
            (measured - area).abs() <= 1.0e-6 * area,
            "area {measured} != {area} for {switches:?}"
        );
        assert!(output.intensities.iter().all(|value| *value >= 0.0));
        assert!(output.warnings.is_empty(), "{:?}", output.warnings);
    }
}

#[test]
fn all_mechanisms_off_reproduces_the_instrument_function() {
    let transition = LinePreset::Helium447.transition().expect("preset");
    let axis = WavelengthAxis::stepped(446.8, 447.5, 0.005).expect("axis");
    let conditions = PlasmaConditions {
        temperature: Some(20_000.0),
        electron_density: Some(1.0e22),
        switches: MechanismSwitches::all(MechanismSwitch::Off),
        ..PlasmaConditions::default()
    };
    let output = synthesizer(StarkAccuracy::Tabulated)
        .synthesize(
            SynthesisInput::new(&transition, axis.points(), 2.0).with_conditions(conditions),
            &InstrumentShape::Gaussian { fwhm: 0.08 },
        )
        .expect("synthesis should succeed");

    assert!(output.mechanisms.is_empty());
    let expected = gaussian(axis.points(), transition.wavelength, 0.08);
    let scale = 2.0 / integral(&expected, axis.resolution());
    let peak = expected.iter().copied().fold(0.0, f64::max) * scale;
    for (actual, expected) in output.intensities.iter().zip(&expected) {
        assert!(
            (actual - expected * scale).abs() <= 1.0e-9 * peak,
            "{actual} vs {}",
            expected * scale
        );
    }
}

#[test]
fn doppler_width_scales_with_square_root_of_temperature() {
    let transition = LinePreset::HydrogenAlpha.transition().expect("preset");
    let axis = WavelengthAxis::stepped(655.9, 656.7, 0.002).expect("axis");
    let synthesizer = synthesizer(StarkAccuracy::Tabulated);

    let width_at = |temperature: f64| {
        let conditions = PlasmaConditions {
            temperature: Some(temperature),
            switches: only(Mechanism::Doppler),
            ..PlasmaConditions::default()
        };
        let output = synthesizer
            .synthesize(
                SynthesisInput::new(&transition, axis.points(), 1.0).with_conditions(conditions),
                &InstrumentShape::Unresolved,
            )
            .expect("synthesis should succeed");
        assert!(output.diagnostics.contains_key(&ProfileComponent::ThermalDoppler));
        measured_fwhm(axis.points(), &output.intensities).expect("fwhm")
    };

    let cold = width_at(10_000.0);
    let hot = width_at(40_000.0);
    assert!((hot / cold - 2.0).abs() < 0.02, "ratio {}", hot / cold);

    let expected = thermal_fwhm(transition.wavelength, 10_000.0, transition.emitter.mass);
    assert!(
        ((cold - expected) / expected).abs() < 0.03,
        "fwhm {cold} vs {expected}"
    );
}

#[test]
fn zeeman_selection_rule_for_j1_to_j1() {
    let components =
        zeeman_components(ZeemanInput::new(500.0, 1.0, 1.0, 1.0, 1.5, 1.0)).expect("components");
    assert_eq!(components.len(), 7);
    assert!(
        components
            .iter()
            .all(|component| (component.upper_m - component.lower_m).abs() <= 1.0)
    );

    let non_zero: Vec<(f64, f64)> = components
        .iter()
        .filter(|component| component.intensity > 0.0)
        .map(|component| (component.upper_m, component.lower_m))
        .collect();
    assert_eq!(non_zero.len(), 6);
    assert!(!non_zero.contains(&(0.0, 0.0)), "0 -> 0 pi component vanishes");

    let pi = components
        .iter()
        .filter(|component| component.polarization == Polarization::Pi)
        .count();
    assert_eq!(pi, 3);
}

#[test]
fn hydrogen_alpha_end_to_end_matches_reference_width() {
    let transition = LinePreset::HydrogenAlpha.transition().expect("preset");
    let axis = WavelengthAxis::stepped(655.0, 657.0, 0.1).expect("axis");
    let conditions = PlasmaConditions {
        temperature: Some(1_000.0),
        electron_density: Some(1.0e23),
        electron_temperature: Some(20_000.0),
        ..PlasmaConditions::default()
    };
    let output = synthesizer(StarkAccuracy::Fast)
        .synthesize(
            SynthesisInput::new(&transition, axis.points(), 1.0)
                .with_center(656.28)
                .with_conditions(conditions),
            &InstrumentShape::Unresolved,
        )
        .expect("synthesis should succeed");

    assert_eq!(output.intensities.len(), axis.len());
    assert_eq!(output.mechanisms, vec![Mechanism::Doppler, Mechanism::Stark]);

    let area = integral(&output.intensities, axis.resolution());
    assert!((area - 1.0).abs() <= 1.0e-6, "area {area}");

    let peak_index = output
        .intensities
        .iter()
        .enumerate()
        .max_by(|lhs, rhs| lhs.1.total_cmp(rhs.1))
        .map(|(index, _)| index)
        .expect("peak");
    assert!((axis.points()[peak_index] - 656.28).abs() <= 0.1);
    for (index, pair) in output.intensities.windows(2).enumerate() {
        if index < peak_index {
            assert!(pair[1] >= pair[0], "rising edge broken at {index}");
        } else {
            assert!(pair[1] <= pair[0], "falling edge broken at {index}");
        }
    }

    let fwhm = measured_fwhm(axis.points(), &output.intensities).expect("fwhm");
    assert!((fwhm - 1.1).abs() <= 0.2, "fwhm {fwhm}");
}

#[test]
fn non_uniform_caller_axis_is_synthesized() {
    let transition = LinePreset::Oxygen777.transition().expect("preset");
    // Coarse wings around a dense core.
    let mut points: Vec<f64> = (0..20).map(|index| 776.0 + 0.05 * index as f64).collect();
    points.extend((0..80).map(|index| 777.0 + 0.005 * index as f64));
    points.extend((0..=20).map(|index| 777.4 + 0.05 * index as f64));
    let axis = WavelengthAxis::new(points).expect("strictly increasing axis");

    let conditions = PlasmaConditions {
        temperature: Some(3_000.0),
        ..PlasmaConditions::default()
    };
    let output = synthesizer(StarkAccuracy::Tabulated)
        .synthesize(
            SynthesisInput::new(&transition, axis.points(), 1.0).with_conditions(conditions),
            &InstrumentShape::Gaussian { fwhm: 0.02 },
        )
        .expect("non-uniform axis should synthesize");

    assert_eq!(output.intensities.len(), axis.len());
    assert_eq!(output.mechanisms, vec![Mechanism::Doppler]);
    let fine_steps: Vec<f64> = output
        .fine_wavelengths
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .collect();
    let fine_step = (axis.last() - axis.first()) / fine_steps.len() as f64;
    assert!(
        fine_steps.iter().all(|step| (step - fine_step).abs() < 1.0e-9),
        "fine axis should be evenly spaced"
    );

    let area = integral(&output.intensities, axis.resolution());
    assert!((area - 1.0).abs() <= 1.0e-6, "area {area}");
    assert!(output.intensities.iter().all(|value| *value >= 0.0));

    let peak_index = output
        .intensities
        .iter()
        .enumerate()
        .max_by(|lhs, rhs| lhs.1.total_cmp(rhs.1))
        .map(|(index, _)| index)
        .expect("peak");
    assert!((axis.points()[peak_index] - transition.wavelength).abs() <= 0.005);

    let doppler = thermal_fwhm(transition.wavelength, 3_000.0, transition.emitter.mass);
    let expected = (0.02_f64.powi(2) + doppler.powi(2)).sqrt();
    let fwhm = measured_fwhm(axis.points(), &output.intensities).expect("fwhm");
    assert!(
        ((fwhm - expected) / expected).abs() < 0.1,
        "fwhm {fwhm} vs {expected}"
    );
}
