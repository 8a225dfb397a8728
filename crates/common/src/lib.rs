//! Shared value types for the ripple workspace.
//!
//! # Invariants
//! - Grid dimensions are derived from the viewport with ceiling division.
//! - Index math is row-major: `y * width + x`.

mod types;

pub use types::{CellCoord, GridDims, Viewport};
