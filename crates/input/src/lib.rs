//! Input capture: host events reduced to a snapshot the frame step polls.
//!
//! # Invariants
//! - Handlers only write scalar state; the frame step reads it once per frame.
//! - Pointer, touch and scroll movement count as interaction; leaving does not.

pub mod event;
pub mod state;

pub use event::{InputEvent, InputResponse};
pub use state::{InputSnapshot, InputState};
