pub mod conditions;
pub mod errors;
pub mod transition;

pub use conditions::{
    Mechanism, MechanismSwitch, MechanismSwitches, PlasmaConditions, ResolvedConditions,
};
pub use errors::{LineShapeError, LineShapeErrorCategory, LineShapeResult};
pub use transition::{PerturberSpec, PlasmaContext, SpeciesProperties, Transition};
