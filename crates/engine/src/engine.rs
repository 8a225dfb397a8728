use std::time::{Duration, Instant};

use glam::Vec2;
use ripple_common::{CellCoord, GridDims, Viewport};
use ripple_input::{InputEvent, InputResponse, InputSnapshot, InputState};
use ripple_kernel::{AmbientDrops, PointerRipple, ScrollWake, WaveField};
use ripple_render::{OverlayPainter, PixelFrame};

use crate::config::EngineConfig;
use crate::error::StartAbort;
use crate::host::{Environment, FrameHost, FrameId};
use crate::timer::{EngineStats, FrameTimer};

const TIMER_HISTORY: usize = 120;

/// Lifecycle phase. Visibility is tracked separately by the input state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Running,
    Idle,
    Destroyed,
}

/// Outcome of one frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// One simulate + paint step ran.
    Stepped,
    /// Too soon after the previous step.
    Throttled,
    /// Surface hidden, no work done.
    Hidden,
    /// The loop stops here: idle timeout, or the engine is not running.
    Stop,
}

impl Tick {
    pub fn keeps_scheduling(self) -> bool {
        !matches!(self, Tick::Stop)
    }
}

/// Everything allocated per mounted surface.
#[derive(Debug)]
struct Scene {
    field: WaveField,
    painter: OverlayPainter,
    ambient: AmbientDrops,
    pointer: PointerRipple,
    scroll: ScrollWake,
    last_scroll: f32,
    cell_size: u32,
    painted: bool,
}

impl Scene {
    fn new(config: &EngineConfig, env: &Environment, viewport: Viewport) -> Self {
        let cell_size = env.cell_size(config);
        let dims = GridDims::from_viewport(viewport, cell_size);
        Self {
            field: WaveField::new(dims, config.damping),
            painter: OverlayPainter::new(dims, config.palette.clone(), env.caustics()),
            ambient: AmbientDrops::new(config.ambient_settings(), config.seed),
            pointer: config.pointer_ripple(),
            scroll: config.scroll_wake(),
            last_scroll: 0.0,
            cell_size,
            painted: false,
        }
    }

    /// Field and pixel frame move to the new size together.
    fn resize(&mut self, viewport: Viewport) -> GridDims {
        let dims = GridDims::from_viewport(viewport, self.cell_size);
        self.field.resize(dims);
        self.painter.resize(dims);
        self.painted = false;
        dims
    }

    fn cell_of(&self, pos: Vec2) -> CellCoord {
        let cell = (pos / self.cell_size as f32).floor();
        CellCoord::new(cell.x as i32, cell.y as i32)
    }

    fn step(&mut self, input: InputSnapshot, now: Duration) {
        let dims = self.field.dims();
        if let Some(drop) = self.ambient.poll(now, dims) {
            tracing::trace!(x = drop.at.x, y = drop.at.y, "ambient drop");
            drop.apply(&mut self.field);
        }
        let pointer_drop = input
            .pointer
            .and_then(|pos| self.pointer.drop_at(self.cell_of(pos), dims));
        if let Some(drop) = pointer_drop {
            drop.apply(&mut self.field);
        }
        self.scroll
            .apply(&mut self.field, input.scroll_offset, self.last_scroll);
        self.last_scroll = input.scroll_offset;

        self.field.simulate();
        self.painter.paint(&self.field, now.as_secs_f32());
        self.painted = true;
    }
}

/// One overlay instance: owns its buffers, input state and frame loop.
///
/// The host delivers events through [`Engine::handle`] and fired frames
/// through [`Engine::on_frame`]. At most one frame request is outstanding at
/// any time.
#[derive(Debug)]
pub struct Engine<H: FrameHost> {
    config: EngineConfig,
    env: Environment,
    host: H,
    phase: Phase,
    input: InputState,
    scene: Option<Scene>,
    pending: Option<FrameId>,
    last_step: Option<Duration>,
    stats: EngineStats,
    timer: FrameTimer,
}

impl<H: FrameHost> Engine<H> {
    /// Nothing is allocated or scheduled until [`Engine::mount`].
    pub fn new(config: EngineConfig, env: Environment, host: H) -> Self {
        Self {
            config,
            env,
            host,
            phase: Phase::Uninitialized,
            input: InputState::default(),
            scene: None,
            pending: None,
            last_step: None,
            stats: EngineStats::default(),
            timer: FrameTimer::new(TIMER_HISTORY),
        }
    }

    /// Allocate buffers for `viewport` and start the frame loop.
    ///
    /// On abort the engine stays uninitialized for good.
    pub fn mount(&mut self, viewport: Viewport, now: Duration) -> Result<(), StartAbort> {
        if self.phase != Phase::Uninitialized {
            return Ok(());
        }
        if self.env.reduced_motion {
            return Err(StartAbort::ReducedMotion);
        }
        if !self.env.surface_available {
            return Err(StartAbort::SurfaceUnavailable);
        }
        let scene = Scene::new(&self.config, &self.env, viewport);
        let dims = scene.field.dims();
        tracing::debug!(
            width = dims.width,
            height = dims.height,
            cell_size = scene.cell_size,
            "engine mounted"
        );
        self.scene = Some(scene);
        self.input = InputState::new(now);
        self.phase = Phase::Running;
        self.schedule();
        Ok(())
    }

    /// Fold a host event into the engine.
    pub fn handle(&mut self, event: InputEvent, now: Duration) {
        if !self.is_live() {
            return;
        }
        match self.input.apply(event, now) {
            InputResponse::Updated => {}
            InputResponse::Wake => self.wake(now),
            InputResponse::Resize(viewport) => self.resize(viewport),
        }
    }

    /// Record an interaction and make sure the loop runs.
    pub fn wake(&mut self, now: Duration) {
        if !self.is_live() {
            return;
        }
        self.input.touch(now);
        if self.phase == Phase::Idle {
            self.phase = Phase::Running;
            self.stats.wakes += 1;
            tracing::debug!("engine woke from idle");
        }
        self.schedule();
    }

    /// Host callback for a fired frame.
    ///
    /// Returns `None` when no frame was pending, e.g. a redraw the engine did
    /// not ask for, or any callback after [`Engine::destroy`].
    pub fn on_frame(&mut self, now: Duration) -> Option<Tick> {
        self.pending.take()?;
        self.stats.callbacks += 1;
        let tick = self.tick(now);
        if tick.keeps_scheduling() {
            self.schedule();
        }
        Some(tick)
    }

    /// Decide what this frame does and do it. Does not schedule.
    pub fn tick(&mut self, now: Duration) -> Tick {
        if self.phase != Phase::Running {
            return Tick::Stop;
        }
        if !self.input.is_visible() {
            self.stats.hidden += 1;
            return Tick::Hidden;
        }
        if self.input.idle_for(now) >= self.config.idle_timeout() {
            self.phase = Phase::Idle;
            self.stats.idle_stops += 1;
            tracing::debug!(
                idle_ms = self.input.idle_for(now).as_millis() as u64,
                "engine idle, frame loop stopped"
            );
            return Tick::Stop;
        }
        let interval = self.config.frame_interval();
        if self
            .last_step
            .is_some_and(|last| now.saturating_sub(last) < interval)
        {
            self.stats.throttled += 1;
            return Tick::Throttled;
        }
        self.step(now);
        Tick::Stepped
    }

    fn step(&mut self, now: Duration) {
        let _span = tracing::info_span!("engine_frame").entered();
        let started = Instant::now();
        let input = self.input.snapshot();
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        scene.step(input, now);
        self.last_step = Some(now);
        self.stats.steps += 1;
        self.timer.record(started.elapsed());
        tracing::trace!(step = self.stats.steps, "frame stepped");
    }

    fn resize(&mut self, viewport: Viewport) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let dims = scene.resize(viewport);
        self.stats.resizes += 1;
        tracing::debug!(
            width = dims.width,
            height = dims.height,
            "engine buffers reallocated"
        );
    }

    /// Stop for good: cancel the pending frame and release the buffers.
    pub fn destroy(&mut self) {
        if self.phase == Phase::Destroyed {
            return;
        }
        if let Some(id) = self.pending.take() {
            self.host.cancel_frame(id);
        }
        self.scene = None;
        self.phase = Phase::Destroyed;
        tracing::debug!("engine destroyed");
    }

    fn schedule(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(self.host.request_frame());
            self.stats.frames_requested += 1;
        }
    }

    fn is_live(&self) -> bool {
        matches!(self.phase, Phase::Running | Phase::Idle)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_hidden(&self) -> bool {
        !self.input.is_visible()
    }

    pub fn field(&self) -> Option<&WaveField> {
        self.scene.as_ref().map(|s| &s.field)
    }

    /// The last painted frame, if a step has run since mount or resize.
    pub fn frame(&self) -> Option<&PixelFrame> {
        self.scene
            .as_ref()
            .filter(|s| s.painted)
            .map(|s| s.painter.frame())
    }

    /// Field and pixel frame lengths, for checking they move together.
    pub fn buffer_lens(&self) -> Option<(usize, usize, usize)> {
        self.scene.as_ref().map(|s| {
            (
                s.field.current().len(),
                s.field.previous().len(),
                s.painter.frame().pixels().len(),
            )
        })
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
