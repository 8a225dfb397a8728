use glam::Vec2;
use ripple_common::Viewport;

/// A host event relevant to the overlay.
///
/// Desktop windows and browser documents both translate their native events
/// into these; the engine never sees platform types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a position in surface pixels.
    PointerMove(Vec2),
    /// Pointer left the surface.
    PointerLeave,
    /// A touch point moved to a position in surface pixels.
    TouchMove(Vec2),
    /// The last touch point lifted or was cancelled.
    TouchEnd,
    /// Document scroll offset in pixels.
    Scroll(f32),
    /// Surface resized.
    Resize(Viewport),
    /// Document became visible (`true`) or hidden (`false`).
    Visibility(bool),
}

impl InputEvent {
    /// Whether the event counts as user interaction for idle tracking.
    pub fn is_interaction(&self) -> bool {
        matches!(
            self,
            Self::PointerMove(_) | Self::TouchMove(_) | Self::Scroll(_)
        )
    }
}

/// What the engine has to do after an event was folded into the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResponse {
    /// State updated, nothing else to do.
    Updated,
    /// Interaction or visibility regained: wake the frame loop.
    Wake,
    /// Buffers must be reallocated for the new surface size.
    Resize(Viewport),
}
