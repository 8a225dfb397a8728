use crate::config::EngineConfig;

/// Handle of one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

/// The host's per-frame scheduling primitive.
///
/// A browser maps this to `requestAnimationFrame`, a winit window to
/// `request_redraw`. The host later calls [`crate::Engine::on_frame`] for
/// every frame it fired.
pub trait FrameHost {
    /// Schedule one callback.
    fn request_frame(&mut self) -> FrameId;
    /// Drop a scheduled callback that has not fired yet.
    fn cancel_frame(&mut self, id: FrameId);
}

/// Host capabilities read once when the overlay starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    /// User asked for reduced motion: the overlay never starts.
    pub reduced_motion: bool,
    /// Touch-capable device: coarser grid, no caustics.
    pub touch_capable: bool,
    /// A surface to paint on could be acquired.
    pub surface_available: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            touch_capable: false,
            surface_available: true,
        }
    }
}

impl Environment {
    pub fn cell_size(&self, config: &EngineConfig) -> u32 {
        if self.touch_capable {
            config.touch_cell_size
        } else {
            config.cell_size
        }
    }

    pub fn caustics(&self) -> bool {
        !self.touch_capable
    }
}

/// Deterministic host that only fires frames when told to.
///
/// Used by tests as a spy on the scheduling primitive and by headless
/// drivers running on a virtual clock.
#[derive(Debug, Default)]
pub struct ManualHost {
    next_id: u64,
    pending: Option<FrameId>,
    requests: usize,
    cancellations: usize,
}

impl ManualHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// The callback waiting to fire, if any.
    pub fn pending(&self) -> Option<FrameId> {
        self.pending
    }

    /// Fire the pending callback: returns its id and clears it.
    pub fn fire(&mut self) -> Option<FrameId> {
        self.pending.take()
    }

    /// Total frames requested so far.
    pub fn requests(&self) -> usize {
        self.requests
    }

    /// Total cancellations received so far.
    pub fn cancellations(&self) -> usize {
        self.cancellations
    }
}

impl FrameHost for ManualHost {
    fn request_frame(&mut self) -> FrameId {
        self.next_id += 1;
        let id = FrameId(self.next_id);
        self.pending = Some(id);
        self.requests += 1;
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if self.pending == Some(id) {
            self.pending = None;
        }
        self.cancellations += 1;
    }
}
