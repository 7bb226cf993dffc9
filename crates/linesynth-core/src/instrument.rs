use serde::{Deserialize, Serialize};

use crate::domain::Transition;
use crate::kernels::{gaussian, pseudo_voigt};

/// Spectrometer response evaluated on the synthesizer's fine axis.
pub trait InstrumentFunction {
    /// Response on `axis` centred on `center`. The result need not be
    /// normalized; the synthesizer rescales the final profile.
    fn response(&self, axis: &[f64], center: f64, transition: &Transition) -> Vec<f64>;
}

/// Instrument shapes described directly by width and shape parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum InstrumentShape {
    /// Gaussian with FWHM in nm.
    Gaussian { fwhm: f64 },
    /// Pseudo-Voigt with FWHM in nm and Lorentzian fraction in [0, 1].
    PseudoVoigt { fwhm: f64, lorentz_fraction: f64 },
    /// Gaussian one axis step wide.
    #[default]
    Unresolved,
}

impl InstrumentFunction for InstrumentShape {
    fn response(&self, axis: &[f64], center: f64, _transition: &Transition) -> Vec<f64> {
        match *self {
            Self::Gaussian { fwhm } => gaussian(axis, center, fwhm),
            Self::PseudoVoigt {
                fwhm,
                lorentz_fraction,
            } => pseudo_voigt(axis, center, fwhm, lorentz_fraction),
            Self::Unresolved => {
                let step = match axis {
                    [first, second, ..] => (second - first).abs(),
                    _ => 0.0,
                };
                gaussian(axis, center, step)
            }
        }
    }
}

/// Adapts a closure `(axis, center) -> response` to [`InstrumentFunction`].
pub struct FnInstrument<F>(pub F);

impl<F> InstrumentFunction for FnInstrument<F>
where
    F: Fn(&[f64], f64) -> Vec<f64>,
{
    fn response(&self, axis: &[f64], center: f64, _transition: &Transition) -> Vec<f64> {
        (self.0)(axis, center)
    }
}

impl<T: InstrumentFunction + ?Sized> InstrumentFunction for &T {
    fn response(&self, axis: &[f64], center: f64, transition: &Transition) -> Vec<f64> {
        (**self).response(axis, center, transition)
    }
}

#[cfg(test)]
mod tests {
    use super::{FnInstrument, InstrumentFunction, InstrumentShape};
    use crate::common::builtin_species;
    use crate::domain::Transition;
    use crate::kernels::{gaussian, measured_fwhm};
    use crate::numerics::linear_grid;

    fn transition() -> Transition {
        Transition::new(500.0, 3.0, 0.5, builtin_species("He I").expect("helium"))
    }

    #[test]
    fn shapes_evaluate_their_kernels() {
        let axis = linear_grid(499.0, 501.0, 2001);
        let response =
            InstrumentShape::Gaussian { fwhm: 0.1 }.response(&axis, 500.0, &transition());
        let fwhm = measured_fwhm(&axis, &response).expect("fwhm");
        assert!((fwhm - 0.1).abs() < 1.0e-4);

        let unresolved = InstrumentShape::Unresolved.response(&axis, 500.0, &transition());
        let step_fwhm = measured_fwhm(&axis, &unresolved).expect("fwhm");
        assert!(step_fwhm < 0.003, "unresolved width {step_fwhm}");
    }

    #[test]
    fn closures_act_as_instruments() {
        let axis = linear_grid(0.0, 1.0, 11);
        let instrument = FnInstrument(|axis: &[f64], center: f64| gaussian(axis, center, 0.2));
        assert_eq!(
            instrument.response(&axis, 0.5, &transition()),
            gaussian(&axis, 0.5, 0.2)
        );
    }

    #[test]
    fn shapes_deserialize_from_tagged_json() {
        let shape: InstrumentShape =
            serde_json::from_str(r#"{"shape":"pseudo_voigt","fwhm":0.05,"lorentz_fraction":0.3}"#)
                .expect("json");
        assert_eq!(
            shape,
            InstrumentShape::PseudoVoigt {
                fwhm: 0.05,
                lorentz_fraction: 0.3
            }
        );
    }
}
