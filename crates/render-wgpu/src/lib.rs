//! wgpu backend for the ripple overlay.
//!
//! Uploads the painted pixel frame (one texel per grid cell) and stretches it
//! over the surface with alpha blending.
//!
//! # Invariants
//! - The blitter never touches the wave field; it only reads pixel frames.
//! - The texture always has the dimensions of the last uploaded frame.
//! - Nothing is drawn on top of the backdrop until a frame was uploaded.

mod overlay;
mod shaders;

pub use overlay::OverlayBlitter;
