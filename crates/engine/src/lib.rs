//! Overlay engine: lifecycle, frame pacing and configuration around the wave
//! kernel.
//!
//! # Invariants
//! - At most one frame request is outstanding per engine.
//! - An idle or destroyed engine requests no frames until woken (idle) or
//!   ever again (destroyed).
//! - A start abort leaves nothing allocated and nothing scheduled.
//! - Field and pixel buffers are reallocated together on resize.
//! - No globals: any number of engines can coexist.

mod config;
mod engine;
mod error;
mod host;
mod timer;

pub use config::{AmbientConfig, EngineConfig, PointerConfig, ScrollConfig};
pub use engine::{Engine, Phase, Tick};
pub use error::{ConfigError, StartAbort};
pub use host::{Environment, FrameHost, FrameId, ManualHost};
pub use timer::{EngineStats, FrameTimer};
