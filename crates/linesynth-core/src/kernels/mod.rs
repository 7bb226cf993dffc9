pub mod doppler;
pub mod profiles;
pub mod van_der_waals;
pub mod zeeman;

pub use doppler::{
    DopplerInput, DopplerProfile, doppler_profile, maxwell, sputter_velocity, thermal_fwhm,
    thompson, thompson_symmetric,
};
pub use profiles::{gaussian, impulse, lorentzian, measured_fwhm, pseudo_voigt};
pub use van_der_waals::{
    VanDerWaalsGap, VanDerWaalsInput, is_balmer_alpha, mean_square_radius, van_der_waals_profile,
};
pub use zeeman::{
    Polarization, ZeemanComponent, ZeemanError, ZeemanInput, magnetic_sublevels,
    zeeman_components, zeeman_pattern,
};
