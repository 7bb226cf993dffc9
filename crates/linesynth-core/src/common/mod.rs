pub mod constants;
pub mod species;

pub use species::{
    SpeciesLookupError, builtin_species, format_spectroscopic_name, parse_spectroscopic_name,
    reduced_mass,
};
