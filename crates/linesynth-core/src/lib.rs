//! Synthesis of spectral emission-line shapes for optical plasma
//! diagnostics.

pub mod common;
pub mod config;
pub mod domain;
pub mod instrument;
pub mod kernels;
pub mod numerics;
pub mod presets;
pub mod stark;
pub mod synthesis;

pub use config::{ConfigError, SynthesisConfig, load_synthesis_config};
pub use domain::{
    LineShapeError, LineShapeErrorCategory, LineShapeResult, PlasmaConditions, Transition,
};
pub use instrument::{FnInstrument, InstrumentFunction, InstrumentShape};
pub use presets::LinePreset;
pub use stark::{StarkAccuracy, StarkTableCache, TableRoots};
pub use synthesis::{
    LineProfileSynthesizer, ProfileComponent, SynthesisInput, SynthesisOutput, SynthesisWarning,
};
