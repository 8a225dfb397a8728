use std::time::Duration;

use glam::Vec2;

use crate::event::{InputEvent, InputResponse};

/// Latest input values, written by event handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct InputState {
    pointer: Option<Vec2>,
    pointer_inside: bool,
    scroll_offset: f32,
    visible: bool,
    last_interaction: Duration,
}

/// What one frame step gets to see of the input state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSnapshot {
    /// Pointer in surface pixels, only while it is over the surface.
    pub pointer: Option<Vec2>,
    pub scroll_offset: f32,
    pub visible: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl InputState {
    /// Visible, no pointer, scrolled to the top, interaction stamped at `now`.
    pub fn new(now: Duration) -> Self {
        Self {
            pointer: None,
            pointer_inside: false,
            scroll_offset: 0.0,
            visible: true,
            last_interaction: now,
        }
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn pointer_inside(&self) -> bool {
        self.pointer_inside
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn last_interaction(&self) -> Duration {
        self.last_interaction
    }

    /// Time since the last interaction, saturating at zero.
    pub fn idle_for(&self, now: Duration) -> Duration {
        now.saturating_sub(self.last_interaction)
    }

    /// Stamp an interaction at `now` without any other change.
    pub fn touch(&mut self, now: Duration) {
        self.last_interaction = self.last_interaction.max(now);
    }

    /// Fold one event into the state.
    pub fn apply(&mut self, event: InputEvent, now: Duration) -> InputResponse {
        if event.is_interaction() {
            self.touch(now);
        }
        match event {
            InputEvent::PointerMove(pos) | InputEvent::TouchMove(pos) => {
                if pos.is_finite() {
                    self.pointer = Some(pos);
                    self.pointer_inside = true;
                }
                InputResponse::Wake
            }
            InputEvent::PointerLeave | InputEvent::TouchEnd => {
                self.pointer = None;
                self.pointer_inside = false;
                InputResponse::Updated
            }
            InputEvent::Scroll(offset) => {
                if offset.is_finite() {
                    self.scroll_offset = offset.max(0.0);
                }
                InputResponse::Wake
            }
            InputEvent::Resize(viewport) => InputResponse::Resize(viewport),
            InputEvent::Visibility(visible) => {
                let regained = visible && !self.visible;
                self.visible = visible;
                tracing::trace!(visible, "visibility changed");
                if regained {
                    self.touch(now);
                    InputResponse::Wake
                } else {
                    InputResponse::Updated
                }
            }
        }
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            pointer: if self.pointer_inside { self.pointer } else { None },
            scroll_offset: self.scroll_offset,
            visible: self.visible,
        }
    }
}
