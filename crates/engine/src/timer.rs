use std::time::Duration;

/// Per-engine counters, updated by the frame loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Frames requested from the host.
    pub frames_requested: u64,
    /// Frame callbacks received from the host.
    pub callbacks: u64,
    /// Simulate + paint steps actually run.
    pub steps: u64,
    /// Callbacks skipped by the frame-rate cap.
    pub throttled: u64,
    /// Callbacks skipped while hidden.
    pub hidden: u64,
    /// Times the loop stopped for lack of interaction.
    pub idle_stops: u64,
    /// Idle-to-running transitions.
    pub wakes: u64,
    /// Buffer reallocations after a surface resize.
    pub resizes: u64,
}

impl std::fmt::Display for EngineStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "requested={} callbacks={} steps={} throttled={} hidden={} idle_stops={} wakes={} resizes={}",
            self.frames_requested,
            self.callbacks,
            self.steps,
            self.throttled,
            self.hidden,
            self.idle_stops,
            self.wakes,
            self.resizes
        )
    }
}

/// Ring buffer of recent step durations for instrumentation.
#[derive(Debug)]
pub struct FrameTimer {
    history: Vec<Duration>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: vec![Duration::ZERO; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    fn recorded(&self) -> &[Duration] {
        &self.history[..self.count()]
    }

    pub fn average(&self) -> Duration {
        let count = self.count();
        if count == 0 {
            return Duration::ZERO;
        }
        self.recorded().iter().sum::<Duration>() / count as u32
    }

    pub fn max(&self) -> Duration {
        self.recorded().iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.recorded().iter().copied().min().unwrap_or(Duration::ZERO)
    }

    pub fn count(&self) -> usize {
        if self.filled {
            self.capacity
        } else {
            self.index
        }
    }
}
