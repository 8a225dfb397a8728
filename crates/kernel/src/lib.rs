//! Wave kernel: the simulated displacement field and the stimuli feeding it.
//!
//! # Invariants
//! - `inject_disturbance` is the only external write into the field.
//! - Damping stays below 1, so energy from any finite input decays.
//! - Both field buffers are reallocated together on resize.

pub mod field;
pub mod sources;

pub use field::{DEFAULT_DAMPING, WaveField};
pub use sources::{
    AmbientDrops, AmbientSettings, Disturbance, DropRng, PointerRipple, ScrollWake,
};
