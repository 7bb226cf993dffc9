//! Physical constants (CODATA 2018, SI units) shared by the broadening kernels.
//!
//! Kernels take wavelengths in nm, temperatures in K, masses in u and energies
//! in eV; these values are the only place unit conversions draw from.

pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;
pub const BOLTZMANN: f64 = 1.380_649e-23;
pub const ATOMIC_MASS_UNIT: f64 = 1.660_539_066_60e-27;
pub const ELECTRON_VOLT: f64 = 1.602_176_634e-19;
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;
pub const PLANCK: f64 = 6.626_070_15e-34;
pub const VACUUM_PERMITTIVITY: f64 = 8.854_187_812_8e-12;
pub const BOHR_MAGNETON: f64 = 9.274_010_078_3e-24;
pub const RYDBERG_ENERGY_EV: f64 = 13.598_44;

pub const NM_PER_M: f64 = 1.0e9;
pub const CM_PER_NM: f64 = 1.0e-7;
pub const PER_CM3_PER_M3: f64 = 1.0e-6;
pub const CM3_PER_ANGSTROM3: f64 = 1.0e-24;
pub const NM_PER_ANGSTROM: f64 = 0.1;

#[cfg(test)]
mod tests {
    use super::{
        BOLTZMANN, ELECTRON_VOLT, ELEMENTARY_CHARGE, PLANCK, RYDBERG_ENERGY_EV, SPEED_OF_LIGHT,
    };

    #[test]
    fn one_electron_volt_is_about_11605_kelvin() {
        assert_eq!(ELECTRON_VOLT, ELEMENTARY_CHARGE);
        assert!((ELECTRON_VOLT / BOLTZMANN - 11_604.518).abs() < 1.0e-2);
    }

    #[test]
    fn photon_energy_of_balmer_alpha_is_about_1_89_ev() {
        let energy_ev = PLANCK * SPEED_OF_LIGHT / (656.28e-9) / ELECTRON_VOLT;
        assert!((energy_ev - 1.889).abs() < 1.0e-3);
        assert!(RYDBERG_ENERGY_EV > energy_ev);
    }
}
