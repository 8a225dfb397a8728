//! Rendering adapter: turns the wave field into something a host can show.
//!
//! # Invariants
//! - Renderers read the field; they never write it.
//! - Overlay alpha is bounded by the palette, so the effect stays translucent.
//! - The pixel frame always has the field's dimensions before it is written.

mod overlay;
mod renderer;

pub use overlay::{OverlayPainter, Palette, PixelFrame, Rgba};
pub use renderer::{AsciiRenderer, FieldRenderer};
